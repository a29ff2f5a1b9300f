// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Myotome CLI entrypoint.
//!
//! Runs the interactive body-map TUI. Body-map documents are read from an
//! assets directory (`front.bodymap` / `rear.bodymap`); `--demo` uses the
//! built-in documents instead.

use std::error::Error;
use std::path::PathBuf;

use myotome::diagram::AssetCatalog;
use myotome::store::PrefsFile;
use myotome::tui::{run, RunOptions};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<assets-dir>] [--prefs <file>]\n  {program} --assets <dir> [--prefs <file>]\n  {program} --demo [--prefs <file>]\n\nIf assets-dir/--assets is omitted, the current working directory is used.\n--demo uses built-in body maps and cannot be combined with assets-dir/--assets.\n--prefs overrides where the view-mode preference is stored."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    assets_dir: Option<String>,
    prefs: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--assets" => {
                if options.assets_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.assets_dir = Some(dir);
            }
            "--prefs" => {
                if options.prefs.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.prefs = Some(path);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.assets_dir.is_some() {
                    return Err(());
                }
                options.assets_dir = Some(arg);
            }
        }
    }

    if options.demo && options.assets_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "myotome".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let (catalog, default_prefs_dir) = if options.demo {
            let demo_dir = std::env::temp_dir().join(format!(
                "myotome-demo-{}",
                std::process::id()
            ));
            (AssetCatalog::embedded(), demo_dir)
        } else {
            let dir = options.assets_dir.unwrap_or_else(|| ".".to_owned());
            (AssetCatalog::from_dir(&dir), PathBuf::from(dir))
        };

        let prefs = match options.prefs {
            Some(path) => PrefsFile::new(path),
            None => PrefsFile::in_dir(default_prefs_dir),
        };

        run(RunOptions { catalog, prefs })
    })();

    if let Err(err) = result {
        eprintln!("myotome: {err}");
        std::process::exit(1);
    }
}
