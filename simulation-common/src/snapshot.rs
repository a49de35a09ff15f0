use crate::kind::{Kind, KindCounts};
use crate::render::{TokenRenderer, TokenView};
use crate::vecmath::Vec2;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One token as stored in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub kind: Kind,
    pub x: f32,
    pub y: f32,
}

impl From<&TokenView> for TokenRecord {
    fn from(view: &TokenView) -> Self {
        TokenRecord { kind: view.kind, x: view.position.x, y: view.position.y }
    }
}

/// A snapshot of the simulation state at a specific step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of steps taken when the snapshot was recorded.
    pub step: u64,
    /// Population per kind.
    pub kind_counts: KindCounts,
    /// Every token in simulation order. Only present when the run is
    /// configured with `save_tokens_in_snapshot`.
    pub tokens: Option<Vec<TokenRecord>>,
}

impl Snapshot {
    pub fn token_count(&self) -> u32 {
        self.kind_counts.total()
    }

    /// Feeds every recorded token to `renderer`, in simulation order.
    /// Returns false when the snapshot carries no token positions.
    pub fn replay<R: TokenRenderer + ?Sized>(&self, radius: f32, renderer: &mut R) -> bool {
        let Some(tokens) = &self.tokens else {
            return false;
        };
        for record in tokens {
            renderer.render_token(&TokenView {
                kind: record.kind,
                position: Vec2::new(record.x, record.y),
                radius,
            });
        }
        true
    }
}

/// Encoding used for snapshot files.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Bincode,
    MessagePack,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Bincode => "bin",
            OutputFormat::MessagePack => "msgpack",
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(OutputFormat::Json),
            "bin" => Some(OutputFormat::Bincode),
            "msgpack" => Some(OutputFormat::MessagePack),
            _ => None,
        }
    }
}

/// Writes all snapshots to `path` in the given format.
pub fn save_snapshots(path: &Path, snapshots: &[Snapshot], format: OutputFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create snapshot file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    match format {
        OutputFormat::Json => serde_json::to_writer(&mut writer, snapshots)?,
        OutputFormat::Bincode => bincode::serialize_into(&mut writer, snapshots)?,
        OutputFormat::MessagePack => rmp_serde::encode::write(&mut writer, snapshots)?,
    }
    writer.flush()?;
    Ok(())
}

/// Reads snapshots written by [`save_snapshots`], picking the format from the extension.
pub fn load_snapshots(path: &Path) -> Result<Vec<Snapshot>> {
    let format = OutputFormat::from_path(path).with_context(|| {
        format!("Cannot tell snapshot format of '{}' (expected .json, .bin or .msgpack)", path.display())
    })?;
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot file '{}'", path.display()))?;
    let reader = BufReader::new(file);
    let snapshots = match format {
        OutputFormat::Json => serde_json::from_reader(reader)?,
        OutputFormat::Bincode => bincode::deserialize_from(reader)?,
        OutputFormat::MessagePack => rmp_serde::decode::from_read(reader)?,
    };
    Ok(snapshots)
}
