//!
//! log system
//!

use {
    std::env, std::io, tracing_subscriber::filter::LevelFilter,
    tracing_subscriber::EnvFilter,
};

/// Installs the stderr subscriber; `log` records are forwarded to it.
///
/// `verbose` turns on debug output, for one module target when non-empty,
/// for everything otherwise. `RUST_LOG` directives are layered on top.
pub fn init_logging(verbose: Option<&str>) {
    let mut env_filter =
        EnvFilter::new("actix_web=info,actix_server=warn,actix_http=warn,sled=warn");
    if let Some(module) = verbose {
        if module.is_empty() {
            env_filter = env_filter.add_directive(LevelFilter::DEBUG.into());
        } else {
            match format!("{module}=debug").parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(err) => eprintln!("Ignoring verbose target `{module}`: {err}"),
            }
        }
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        if !rust_log.is_empty() {
            for directive in rust_log.split(',').filter_map(|s| match s.parse() {
                Ok(directive) => Some(directive),
                Err(err) => {
                    eprintln!("Ignoring directive `{s}`: {err}");
                    None
                }
            }) {
                env_filter = env_filter.add_directive(directive);
            }
        }
    } else {
        env_filter = env_filter.add_directive(LevelFilter::INFO.into());
    }

    tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
