use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid auto-observer plugin config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// `declare function` / `declare class` have no runtime value to rebind.
    #[error("ambient declaration `{name}` cannot be wrapped")]
    AmbientDeclaration { name: String },
}
