use pin_network::config::pin::{self, RuntimeConfig};
use pin_network::image::io::{load_raster, save_band_png, write_json_file};
use pin_network::sample::PatchSampler;
use pin_network::{FieldSetup, PinLocator, PinMap};
use serde::Serialize;
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = pin::load_config(Path::new(&config_path))?;
    let field = field_from_config(&config)?;

    let locator = PinLocator::new(config.params.clone(), field);
    let result = locator.run().map_err(|e| e.to_string())?;
    let report = &result.report;

    println!("{}", report.summary());
    for level in &report.growth.levels {
        println!(
            "  level {:>3}: candidates={:<5} placed={:<5} holes={:<4} dead_ends={:<4} {:.3} ms",
            level.level_index,
            level.candidates,
            level.placed,
            level.holes,
            level.dead_ends,
            level.elapsed_ms
        );
    }

    if let Some(path) = &config.output.pins_json {
        write_json_file(path, &PinSummary::from_map(&result.map))?;
        println!("Saved {} pins to {}", result.map.pins.len(), path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, report)?;
        println!("Saved run report to {}", path.display());
    }
    if let (Some(path), Some(raster)) = (&config.output.root_patch_png, &locator.field().raster) {
        let params = locator.params();
        let sampler = PatchSampler::from_spacing(
            Arc::clone(raster),
            &params.patch,
            params.row_spacing,
            params.col_spacing,
        );
        let (root, _) = config.row_vector_points();
        match sampler.sample(root) {
            Some(patch) => {
                save_band_png(&patch.bands()[0], path)?;
                println!("Saved root patch to {}", path.display());
            }
            None => println!("Root patch lies outside the raster; no preview written"),
        }
    }
    Ok(())
}

fn field_from_config(config: &RuntimeConfig) -> Result<FieldSetup, String> {
    let (start, stop) = config.row_vector_points();
    let mut field = FieldSetup::new(config.boundary.vertices.clone(), start, stop);
    if let Some(crs) = &config.boundary.crs {
        field = field.with_crs(crs.clone());
    }
    if let Some(raster_cfg) = &config.raster {
        let mut raster = load_raster(&raster_cfg.path, raster_cfg.transform)?;
        if let Some(crs) = &raster_cfg.crs {
            raster = raster.with_crs(crs.clone());
        }
        println!(
            "Loaded raster {} ({}x{}, {} bands)",
            raster_cfg.path.display(),
            raster.width(),
            raster.height(),
            raster.band_count()
        );
        field = field.with_raster(Arc::new(raster));
    }
    Ok(field)
}

fn usage() -> String {
    "Usage: pin_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PinSummary<'a> {
    pin_count: usize,
    placed: usize,
    dead_ends: usize,
    unpatched_holes: usize,
    pins: &'a [pin_network::Pin],
}

impl<'a> PinSummary<'a> {
    fn from_map(map: &'a PinMap) -> Self {
        Self {
            pin_count: map.pins.len(),
            placed: map.placed_count(),
            dead_ends: map.dead_ends,
            unpatched_holes: map.unpatched_holes,
            pins: &map.pins,
        }
    }
}
