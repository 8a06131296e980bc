use anyhow::{anyhow, Result};
use query_annotator::config::{config_stub, default_config_path};

use crate::cli::ConfigArgs;

pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = default_config_path()
            .ok_or_else(|| anyhow!("no config directory on this platform"))?;
        println!("{}", path.display());
        return Ok(());
    }
    println!("{}", config_stub()?);
    Ok(())
}
