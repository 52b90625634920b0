//! Shared fixtures for rewind integration tests and benches: in-memory live
//! targets plus JSON definitions listed in `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod mocks;

pub use mocks::{
    ControllerDef, LayerDef, MockAnimator, MockParticleSystem, MockRigidbody, MockTransform,
    ParticleSystemDef, StateDef,
};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    controllers: HashMap<String, String>,
    #[serde(rename = "particle-systems")]
    particle_systems: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod controllers {
    use super::*;

    pub fn load(name: &str) -> Result<ControllerDef> {
        super::load_json(lookup(&MANIFEST.controllers, "controller", name)?)
    }

    /// Fresh animator driven by the named controller.
    pub fn animator(name: &str) -> Result<MockAnimator> {
        Ok(MockAnimator::new(load(name)?))
    }
}

pub mod particle_systems {
    use super::*;

    pub fn load(name: &str) -> Result<ParticleSystemDef> {
        super::load_json(lookup(&MANIFEST.particle_systems, "particle system", name)?)
    }

    /// Fresh, stopped, empty system built from the named definition.
    pub fn system(name: &str) -> Result<MockParticleSystem> {
        Ok(MockParticleSystem::new(load(name)?))
    }
}
