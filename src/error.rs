use thiserror::Error;

// Why a model completion was rejected by the mesh repair pass
#[derive(Debug, Error, PartialEq)]
pub enum RepairError {
    #[error("no JSON object found in completion")]
    NoJsonFound,
    #[error("completion JSON failed to parse: {0}")]
    MalformedJson(String),
    #[error("completion has no vertices field")]
    MissingVertices,
    #[error("vertex entry is not a triple of numbers")]
    BadVertexShape,
    #[error("only {kept} valid faces survived, need at least {needed}")]
    InsufficientValidFaces { kept: usize, needed: usize },
    #[error("mesh is empty after degenerate face removal")]
    DegenerateMesh,
}

// Failures of the generation path. Never reaches the client - the caller
// substitutes a fallback or keyword-matched mesh instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model request failed: {0}")]
    Model(#[from] reqwest::Error),
    #[error("model returned an empty completion")]
    EmptyCompletion,
    #[error(transparent)]
    Repair(#[from] RepairError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("asset write failed: {0}")]
    Io(#[from] std::io::Error),
}
