//! Build script generating man pages for `e2e-provider`.
//!
//! One page is rendered for the top-level command and one for each command
//! group (`e2e-provider-block-storage.1`, `e2e-provider-kubernetes.1`) into
//! the build output directory.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn render_page(command: Command, out_dir: &Path, file_name: &str) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    Man::new(command).render(&mut buffer)?;
    fs::write(out_dir.join(file_name), buffer)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR was not set")?);

    let root = Cli::command();
    let root_name = root.get_name().to_owned();
    for group in root.get_subcommands() {
        let file_name = format!("{root_name}-{}.1", group.get_name());
        render_page(group.clone(), &out_dir, &file_name)?;
    }
    render_page(root, &out_dir, &format!("{root_name}.1"))?;

    Ok(())
}
