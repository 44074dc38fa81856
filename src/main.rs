// znote - 轻量单文档文本编辑器
//
// Copyright (c) 2025 znote team
//
// Licensed under MIT License

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use znote::{Config, EditorAction, EditorSession, Outcome};

fn main() -> anyhow::Result<()> {
    // 初始化日志（输出到 stderr，避免与命令结果混在一起）
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
        )
        .init();

    info!("znote v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let mut session = EditorSession::new(config);

    if let Some(path) = std::env::args_os().nth(1) {
        let action = EditorAction::Open { path: path.into(), force: true };
        report(session.apply(action));
    }

    run(&mut session, io::stdin().lock(), io::stdout().lock())
}

/// 逐行读取命令并执行，直到 quit 或输入结束
fn run<R: BufRead, W: Write>(
    session: &mut EditorSession,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("读取命令失败")?;

        let action = match EditorAction::parse(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        match session.apply(action) {
            Ok(Outcome::Quit) => {
                writeln!(output, "{}", Outcome::Quit)?;
                return Ok(());
            }
            Ok(outcome) => writeln!(output, "{outcome}")?,
            Err(e) => writeln!(output, "错误: {e}")?,
        }
    }

    Ok(())
}

fn report(result: znote::Result<Outcome>) {
    match result {
        Ok(outcome) => println!("{outcome}"),
        Err(e) => println!("错误: {e}"),
    }
}
