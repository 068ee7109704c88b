use std::path::PathBuf;

use clap::Args;

use crate::auth::GeneratedKeys;

#[derive(Args, Debug)]
pub struct KeygenArgs {
    #[arg(long, default_value = "keys", help = "Directory to write private.pem and public.pem into")]
    pub out_dir: PathBuf,

    #[arg(long, help = "Overwrite existing key files")]
    pub force: bool,
}

pub fn handle(args: KeygenArgs) -> anyhow::Result<()> {
    let keys = GeneratedKeys::generate()?;
    let (private_path, public_path) = keys.write_to(&args.out_dir, args.force)?;

    println!("Wrote private key to {}", private_path.display());
    println!("Wrote public key to {}", public_path.display());
    Ok(())
}
