use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use voxmesh_assets::registry_from_file;
use voxmesh_mesher::{ChunkMeshCache, ChunkMeshDriver, ChunkMeshStat};
use voxmesh_testkit::{ExecutionMetrics, MeshingMetrics, MetricsReportBuilder, MetricsSink};
use voxmesh_world::ChunkStorage;

mod config;
mod scene;

use config::{AppConfig, DEFAULT_CONFIG_PATH};
use scene::SceneKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Greedy voxel chunk mesher", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Block/material pack (overrides the config)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Demo world to mesh
    #[arg(long, value_enum)]
    scene: Option<SceneKind>,

    /// Chunk radius around the origin
    #[arg(long)]
    radius: Option<i32>,

    /// Terrain seed
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (1 = main thread only, 0 = one per core)
    #[arg(long)]
    workers: Option<usize>,

    /// Scan every layer instead of using the vertical reduction index
    #[arg(long)]
    no_vertical_reduction: bool,

    /// Per-chunk metrics output
    #[arg(long)]
    mesh_metrics: Option<PathBuf>,

    /// Run report output
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.registry {
            config.registry = path.clone();
        }
        if let Some(scene) = self.scene {
            config.world.scene = scene;
        }
        if let Some(radius) = self.radius {
            config.world.radius = radius;
        }
        if let Some(seed) = self.seed {
            config.world.seed = seed;
        }
        if let Some(workers) = self.workers {
            config.mesher.workers = workers;
        }
        if self.no_vertical_reduction {
            config.mesher.vertical_reduction = false;
        }
        if let Some(path) = &self.mesh_metrics {
            config.output.chunk_metrics = path.clone();
        }
        if let Some(path) = &self.report {
            config.output.report = path.clone();
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting voxmesh v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = AppConfig::load_from_path(&args.config);
    args.apply(&mut config);
    run(&config)
}

fn run(config: &AppConfig) -> Result<()> {
    let started = Instant::now();
    let registry = registry_from_file(&config.registry).with_context(|| {
        format!(
            "failed to load block pack from {}",
            config.registry.display()
        )
    })?;
    info!(
        blocks = registry.block_count(),
        materials = registry.material_count(),
        "loaded registry"
    );

    let dims = config.dims()?;
    let fill = config.border_fill(&registry)?;
    let radius = config.world.radius.max(0);
    let side = (2 * radius + 1) as usize;
    let mut storage = ChunkStorage::new(side * side, dims);
    let chunks = scene::populate(
        &mut storage,
        &registry,
        config.world.scene,
        radius,
        config.world.seed,
    )?;
    info!(chunks, scene = ?config.world.scene, "generated world");

    let workers = config.mesher.workers;
    if workers > 1 {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
        {
            warn!("Failed to size worker pool: {err}");
        }
    }

    let mut cache = ChunkMeshCache::new();
    let mesh_started = Instant::now();
    let stats = {
        let mut driver = ChunkMeshDriver::new(
            &mut storage,
            &mut cache,
            &registry,
            fill,
            config.mesher_options(),
        );
        if workers == 1 {
            driver.process()
        } else {
            driver.process_parallel()
        }
    };
    let mesh_elapsed = mesh_started.elapsed();

    for stat in &stats {
        tracing::debug!(
            chunk = %stat.position,
            hash = %stat.hash,
            solid = stat.solid_quads,
            water = stat.water_quads,
            "chunk meshed"
        );
    }

    ChunkMeshDriver::write_metrics_to_file(&stats, &config.output.chunk_metrics)?;
    info!(path = %config.output.chunk_metrics.display(), "wrote mesh metrics");

    let meshing = summarize(&stats, mesh_elapsed.as_secs_f64(), config);
    info!(
        chunks = meshing.chunks_meshed,
        solid = meshing.solid_quads,
        water = meshing.water_quads,
        avg_us = format_args!("{:.1}", meshing.avg_mesh_time_us),
        "mesh pass summary"
    );
    let report = MetricsReportBuilder::new(format!("mesh_{:?}", config.world.scene).to_lowercase())
        .meshing(meshing)
        .execution(ExecutionMetrics {
            duration_seconds: started.elapsed().as_secs_f64(),
            validations_passed: None,
        })
        .build();
    MetricsSink::create(&config.output.report)?.write(&report)?;
    info!(path = %config.output.report.display(), "wrote run report");
    Ok(())
}

fn summarize(stats: &[ChunkMeshStat], seconds: f64, config: &AppConfig) -> MeshingMetrics {
    let chunks = stats.len();
    let solid_quads: usize = stats.iter().map(|s| s.solid_quads).sum();
    let water_quads: usize = stats.iter().map(|s| s.water_quads).sum();
    let per_chunk = |total: f64| if chunks == 0 { 0.0 } else { total / chunks as f64 };
    MeshingMetrics {
        chunks_meshed: chunks,
        avg_mesh_time_us: per_chunk(seconds * 1_000_000.0),
        solid_quads,
        water_quads,
        avg_quads_per_chunk: per_chunk((solid_quads + water_quads) as f64),
        chunks_with_placeholders: stats.iter().filter(|s| s.missing_neighbors > 0).count(),
        vertical_reduction: config.mesher.vertical_reduction,
        workers: if config.mesher.workers == 0 {
            rayon::current_num_threads()
        } else {
            config.mesher.workers
        },
    }
}
