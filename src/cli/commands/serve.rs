use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::server;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { port, bind } = cmd {
        let mut cfg = cfg.clone();
        if let Some(p) = port {
            cfg.port = *p;
        }
        if let Some(b) = bind {
            cfg.bind_address = b.clone();
        }
        server::serve(cfg)?;
    }
    Ok(())
}
