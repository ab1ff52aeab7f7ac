// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the chores CLI.
//!
//! ```bash
//! chores completions bash > ~/.local/share/bash-completion/completions/chores
//! chores completions zsh > ~/.zfunc/_chores
//! chores completions fish > ~/.config/fish/completions/chores.fish
//! ```

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

/// Write completions for `shell` to stdout
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "chores", &mut io::stdout());
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
