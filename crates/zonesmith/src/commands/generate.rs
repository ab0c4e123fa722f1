//! `generate` command: run the pipeline and print the change report.

use tracing::debug;
use zonesmith_api::NetboxClient;
use zonesmith_core::{GeneratorSet, pipeline};

use crate::cli::{GenerateArgs, Generator, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: GenerateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = zonesmith_config::load(global.config.as_deref())?;
    let mut settings = config.resolve()?;

    if let Some(serial) = args.serial {
        settings.run.serial_override = Some(serial);
    }
    if let Some(dir) = args.output_dir {
        settings.run.output_root = dir;
    }

    let generators = generator_set(&args.only);
    debug!(?generators, "running generation");

    let client = NetboxClient::from_token(settings.netbox_url.as_str(), &settings.netbox_token)?;
    let report = pipeline::run(&client, &settings.run, generators).await?;

    if report.is_empty() {
        if !global.quiet {
            eprintln!("Everything up to date");
        }
        // Structured formats still emit the (empty) report.
        if global.output == OutputFormat::Table {
            return Ok(());
        }
    }

    let rendered = output::render_report(global.output, &report, output::should_color(global.color));
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// `--only` selection; an empty selection means every generator.
fn generator_set(only: &[Generator]) -> GeneratorSet {
    if only.is_empty() {
        return GeneratorSet::ALL;
    }
    let mut set = GeneratorSet {
        dns: false,
        bind_config: false,
        wireguard: false,
        ip_lists: false,
    };
    for generator in only {
        match generator {
            Generator::Dns => set.dns = true,
            Generator::BindConfig => set.bind_config = true,
            Generator::Wireguard => set.wireguard = true,
            Generator::IpLists => set.ip_lists = true,
        }
    }
    set
}
