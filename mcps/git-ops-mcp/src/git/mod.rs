//! Access to git: the `git` executable for anything that changes a
//! repository, libgit2 for reading it.

pub mod cli;
pub mod inspect;

pub use cli::{GitCli, GitOutput};
