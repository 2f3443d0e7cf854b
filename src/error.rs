use std::io;

/// Failures of the host around the language: I/O, or a program that did not
/// parse. Runtime errors of the language itself are `Object::Error` values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parser errors:\n\t{}", .0.join("\n\t"))]
    Parse(Vec<String>),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
