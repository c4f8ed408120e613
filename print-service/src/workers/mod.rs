mod reaper;

pub use reaper::ArtifactReaper;
