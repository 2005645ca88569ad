//!
//! # ledger host process
//!

use {ruc::*, traceapp::config::peer_cfg::CFG};

fn main() {
    globutils::logging::init_logging(None);
    log::info!(concat!("Build: traced ", env!("CARGO_PKG_VERSION")));

    pnk!(actix_rt::System::new().block_on(traceapp::run_peer(&CFG)));
}
