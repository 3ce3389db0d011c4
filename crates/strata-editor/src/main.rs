// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The Strata editor shell.
//!
//! ```text
//! strata-editor inspect <scene>
//! strata-editor resave <in> <out> [goal]
//! ```
//!
//! `STRATA_CONFIG` may name a RON file with scene I/O settings.

use std::{env, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use strata_agents::{SceneIoConfig, SerializationAgent};
use strata_core::{
    asset::{AssetSourceError, UntypedAssetHandle},
    scene::SerializationGoal,
};
use strata_data::{
    assets::{AssetCatalog, Cubemap, Font, ScriptAsset},
    ecs::World,
    registry::{self, CapabilityRegistry},
};
use strata_editor::{Inspector, ObjectEditorContainer, TextUi};
use strata_lanes::scene_lane::LoadReport;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = match env::var_os("STRATA_CONFIG") {
        Some(path) => SceneIoConfig::load(&path)?,
        None => SceneIoConfig::default(),
    };
    let registry = registry::try_global().context("Failed to build the capability registry")?;
    let assets = AssetCatalog::with_loader(stand_in_asset);
    let agent = SerializationAgent::with_config(registry, &assets, &config);

    match args.get(1).map(String::as_str) {
        Some("inspect") => {
            let [scene] = operands::<1>(&args)?;
            inspect(registry, &agent, Path::new(scene))
        }
        Some("resave") => {
            let [input, output] = operands::<2>(&args)?;
            let goal = match args.get(4) {
                Some(goal) => goal.parse::<SerializationGoal>().map_err(|e| anyhow!(e))?,
                None => agent.default_goal(),
            };
            resave(&agent, Path::new(input), Path::new(output), goal)
        }
        Some(other) => {
            print_help();
            bail!("Unknown command: {other}")
        }
        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Usage:");
    println!("  strata-editor inspect <scene>");
    println!("  strata-editor resave <in> <out> [fastest-load|smallest|debug|stable]");
}

/// The `N` arguments following the command name.
fn operands<const N: usize>(args: &[String]) -> Result<[&str; N]> {
    let mut operands = [""; N];
    for (index, operand) in operands.iter_mut().enumerate() {
        *operand = args
            .get(index + 2)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Missing argument {} of {N}", index + 1))?;
    }
    Ok(operands)
}

fn load(agent: &SerializationAgent<'_>, path: &Path, world: &mut World) -> Result<LoadReport> {
    let report = agent.load(path, world)?;
    println!("{}", report.summary());
    for event in &report.events {
        println!("  - {event}");
    }
    Ok(report)
}

fn inspect(
    registry: &CapabilityRegistry,
    agent: &SerializationAgent<'_>,
    path: &Path,
) -> Result<()> {
    let mut world = World::new();
    let report = load(agent, path, &mut world)?;

    let editors = ObjectEditorContainer::from_registry(registry)?;
    let inspector = Inspector::new(registry, &editors);
    let mut ui = TextUi::new();

    let mut entities: Vec<_> = report.entity_map.iter().map(|(id, e)| (*id, *e)).collect();
    entities.sort();
    for (id, entity) in entities {
        println!("\nEntity {id} ({entity})");
        inspector.inspect_entity(&mut ui, &mut world, entity);
        print!("{}", ui.take());
    }
    for camera in report.cameras {
        let name = world.camera(camera).map(|c| c.name().to_owned()).unwrap_or_default();
        println!("\nCamera '{name}'");
        inspector.inspect_camera(&mut ui, &mut world, camera);
        print!("{}", ui.take());
    }
    println!("\nScene");
    inspector.inspect_scene(&mut ui, &mut world);
    print!("{}", ui.take());
    Ok(())
}

fn resave(
    agent: &SerializationAgent<'_>,
    input: &Path,
    output: &Path,
    goal: SerializationGoal,
) -> Result<()> {
    let mut world = World::new();
    load(agent, input, &mut world)?;
    let report = agent.save_with_goal(output, &world, goal)?;
    for skipped in &report.skipped {
        log::warn!("Not saved: {skipped}");
    }
    println!("Saved '{}' for goal {goal}", output.display());
    Ok(())
}

/// Asset import is not part of the shell: referenced assets are replaced by
/// stand-ins chosen from the file extension, so scenes keep their references.
fn stand_in_asset(identifier: &str) -> Result<UntypedAssetHandle, AssetSourceError> {
    let path = Path::new(identifier);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(identifier);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ttf" | "otf") => Ok(UntypedAssetHandle::new(Font {
            family: stem.to_owned(),
        })),
        Some("lua" | "rhai") => Ok(UntypedAssetHandle::new(ScriptAsset {
            source: String::new(),
        })),
        Some("ktx" | "ktx2" | "hdr") => Ok(UntypedAssetHandle::new(Cubemap { resolution: 1 })),
        _ => Err(AssetSourceError::LoadFailed {
            identifier: identifier.to_owned(),
            reason: "no stand-in for this kind of asset".to_owned(),
        }),
    }
}
