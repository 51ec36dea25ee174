//! Drives one knife through a crate and logs what happens.
//!
//! Run with `RUST_LOG=slicekit=debug` for the full state machine trace.

use std::sync::Arc;

use slicekit::math::{OrientedBox, Point2, Point3, Transform, Vector3};
use slicekit::mesh::{
    MaterialId, MaterialSlot, MeshSection, StandaloneMesh, StaticMeshAsset, INSIDE_CUT_MATERIAL,
};
use slicekit::scene::{Body, ComponentData, Scene, Socket};
use slicekit::tool::{
    EndOutcome, OverlapBegin, SlicingConfig, SlicingTool, SocketMarkers, SocketName, CUTTABLE_TAG,
    KNIFE_TAG,
};

fn cube(half: f64) -> MeshSection {
    let mut section = MeshSection::new(0);
    let corner = |i: usize| {
        let pick = |bit: usize| if i & bit == 0 { -half } else { half };
        Point3::new(pick(1), pick(2), pick(4))
    };
    let faces: [([usize; 4], Vector3); 6] = [
        ([0, 2, 3, 1], -Vector3::z()),
        ([4, 5, 7, 6], Vector3::z()),
        ([0, 1, 5, 4], -Vector3::y()),
        ([2, 6, 7, 3], Vector3::y()),
        ([0, 4, 6, 2], -Vector3::x()),
        ([1, 3, 7, 5], Vector3::x()),
    ];
    for (quad, normal) in faces {
        let ids = quad.map(|c| section.push_vertex(corner(c), normal, Point2::origin()));
        section.indices.push([ids[0], ids[1], ids[2]]);
        section.indices.push([ids[0], ids[2], ids[3]]);
    }
    section
}

fn main() -> slicekit::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("cut_demo=info".parse().unwrap_or_default())
        .add_directive("slicekit=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut scene = Scene::new();

    let crate_asset = Arc::new(StaticMeshAsset::new(
        "SM_Crate",
        vec![cube(10.0)],
        vec![
            MaterialSlot::new("Wood", Some(MaterialId(1))),
            MaterialSlot::new(INSIDE_CUT_MATERIAL, Some(MaterialId(2))),
        ],
    ));
    let crate_actor = scene.spawn_actor("crate");
    let target = scene.add_component(
        crate_actor,
        ComponentData::new(
            "crate",
            Transform::translation(0.0, 0.0, 10.0),
            Body::Standalone(StandaloneMesh::new(crate_asset)),
        )
        .with_tag(CUTTABLE_TAG),
    )?;

    let knife_actor = scene.spawn_actor("knife");
    let knife = scene.add_component(
        knife_actor,
        ComponentData::new(
            "knife",
            Transform::translation(0.0, 0.0, 12.0),
            Body::Marker(OrientedBox::new(Vector3::new(1.0, 20.0, 0.2))),
        )
        .with_tag(KNIFE_TAG)
        .with_socket(Socket::at(SocketName::Handle.as_str(), Point3::new(0.0, -25.0, 0.0)))
        .with_socket(Socket::at(SocketName::Blade.as_str(), Point3::origin()))
        .with_socket(Socket::at(
            SocketName::CuttingExitpoint.as_str(),
            Point3::new(0.0, 20.0, 0.0),
        )),
    )?;

    let config = SlicingConfig {
        show_plane: true,
        show_trajectory: true,
        console_log: true,
        ..SlicingConfig::default()
    };
    SocketMarkers::attach(&mut scene, knife, config.marker_scale)?;
    let mut tool = SlicingTool::builder(knife).config(config).build(&scene)?;

    let begin = OverlapBegin::new(crate_actor, target);
    tool.handle_overlap_begin(&mut scene, &begin);

    // Draw the knife sideways through the crate.
    for step in 0..=6 {
        let x = f64::from(step) * 5.0;
        scene.component_mut(knife)?.transform = Transform::translation(x, 0.0, 12.0);
        tool.tick(&mut scene);
        let draws = scene.take_debug_draws();
        tracing::info!(x, draws = draws.len(), "tick");
    }

    match tool.handle_overlap_end(&mut scene, &begin.ended()) {
        EndOutcome::Committed(result) => {
            for piece in result.pieces {
                let component = scene.component(piece)?;
                tracing::info!(name = %component.name, kind = component.body.kind(), "piece");
            }
        }
        other => tracing::info!(?other, "no cut"),
    }
    tracing::info!(actors = scene.actor_count(), "done");
    Ok(())
}
