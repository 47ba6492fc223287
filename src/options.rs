//! `SolverOptions`'s CLI-facing twin (spec §6): the flags every command-line front-end accepts,
//! parsed with `clap` and turned into a [`SolverOptions`] the same way the teacher's `runner.rs`
//! turns its `Cli` into a `SatisfactionSolverOptions`.
//!
//! Unlike the teacher's `Cli`, this crate has no modelling-language front end to read an instance
//! file with (flatzinc/XCSP-style parsers are a spec Non-goal) — `instance` is kept only so a demo
//! binary can accept a path if it wants one; the demos under `demos/` otherwise build their model
//! directly against the embedding API (spec §6) and only use the flags below.

use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;

use crate::engine::ValueBranch;
use crate::engine::VariableBranch;
use crate::SolverOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VarBranchArg {
    Vsids,
    Lex,
    Dom,
    Domwdeg,
}

impl From<VarBranchArg> for VariableBranch {
    fn from(arg: VarBranchArg) -> Self {
        match arg {
            VarBranchArg::Vsids => VariableBranch::Vsids,
            VarBranchArg::Lex => VariableBranch::Lex,
            VarBranchArg::Dom => VariableBranch::Dom,
            VarBranchArg::Domwdeg => VariableBranch::DomWdeg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValBranchArg {
    Vsids,
    Lex,
    Bisect,
}

impl From<ValBranchArg> for ValueBranch {
    fn from(arg: ValBranchArg) -> Self {
        match arg {
            ValBranchArg::Vsids => ValueBranch::Vsids,
            ValBranchArg::Lex => ValueBranch::Lex,
            ValBranchArg::Bisect => ValueBranch::Bisect,
        }
    }
}

/// The canonical CLI surface of spec §6: `--nolearning --norestart --base-restart N
/// --verbosity N --varbranch NAME --valbranch NAME --trace --stat --all --maint`, plus a
/// positional filename.
#[derive(Debug, Parser)]
#[command(name = "lazyclause", about = "A lazy-clause-generation CSP/SAT solver")]
pub struct Cli {
    /// Model/instance file. Unused by this crate's own demos (they build their model in code);
    /// kept so third-party front-ends built on this library have somewhere to put their path.
    pub instance: Option<PathBuf>,

    #[arg(long)]
    pub nolearning: bool,

    #[arg(long)]
    pub norestart: bool,

    #[arg(long = "base-restart", default_value_t = 100)]
    pub base_restart: u64,

    #[arg(long, default_value_t = 0)]
    pub verbosity: u8,

    #[arg(long, value_enum, default_value = "dom")]
    pub varbranch: VarBranchArg,

    #[arg(long, value_enum, default_value = "bisect")]
    pub valbranch: ValBranchArg,

    #[arg(long)]
    pub trace: bool,

    /// Print end-of-run statistics (spec §6's `--stat`).
    #[arg(long)]
    pub stat: bool,

    /// Enumerate every solution via `excludeLast()` rather than stopping at the first one.
    #[arg(long)]
    pub all: bool,

    /// Keep the process alive after solving to answer further queries (spec §6's `--maint`); not
    /// meaningful for this library's one-shot `Solver::solve`, accepted for CLI compatibility.
    #[arg(long)]
    pub maint: bool,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl Cli {
    pub fn to_solver_options(&self) -> SolverOptions {
        SolverOptions {
            learning_enabled: !self.nolearning,
            restarts_enabled: !self.norestart,
            base_restart_interval: self.base_restart,
            random_seed: self.seed,
            varbranch: self.varbranch.into(),
            valbranch: self.valbranch.into(),
            verbosity: self.verbosity,
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_match_solver_options_default() {
        let cli = Cli::parse_from(["lazyclause"]);
        let options = cli.to_solver_options();
        let default = SolverOptions::default();
        assert_eq!(options.learning_enabled, default.learning_enabled);
        assert_eq!(options.restarts_enabled, default.restarts_enabled);
        assert_eq!(options.base_restart_interval, default.base_restart_interval);
    }

    #[test]
    fn nolearning_flag_disables_learning() {
        let cli = Cli::parse_from(["lazyclause", "--nolearning"]);
        assert!(!cli.to_solver_options().learning_enabled);
    }
}
