// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::{
    env,
    error::Error,
    path::{Path, PathBuf}
};

use tablegen::build::{CodegenOptions, Generator, SourceUnit, rewrite_file};

fn main() -> Result<(), Box<dyn Error>> {
    let out = PathBuf::from(env::var("OUT_DIR")?);
    let src = Path::new("src");
    let model = src.join("model.rs");
    let app = src.join("app.rs");
    println!("cargo:rerun-if-changed={}", model.display());
    println!("cargo:rerun-if-changed={}", app.display());

    let unit = SourceUnit::from_files(src, [&model])?;
    let options = CodegenOptions::from_pairs([
        ("tablegen.db-naming-strategy", "lower-snake-case"),
        ("tablegen.code-naming-strategy", "default")
    ])?;
    let code = Generator::new(options).generate(&unit, "crate::generated")?;
    code.write_to(&out.join("tablegen.rs"))?;

    let report = rewrite_file(&code.registry(), src, &app, &out.join("app.rs"))?;
    if report.untouched() > 0 {
        println!(
            "cargo:warning={} call(s) to generated constructors were left as written",
            report.untouched()
        );
    }
    Ok(())
}
