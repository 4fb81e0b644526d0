mod cli_options;

use std::time::Instant;

use geometry::bbox::BOUND_HUGE;
use geometry::ray::Ray;
use indicatif::{ProgressBar, ProgressStyle};
use math::hcm::Vec3;
use rayon::prelude::*;
use scene::{preset, Scene};
use tlas::{TraceContext, TraversalStats};

use cli_options::CliOptions;

/// Offset along the normal for the origin of shadow rays, so that they don't hit their own
/// surface.
const SHADOW_BIAS: f64 = 1e-6;

/// Hit counts of one or more image rows.
#[derive(Default)]
struct RowSummary {
    hits: usize,
    shadowed: usize,
    stats: TraversalStats,
}

impl std::ops::AddAssign for RowSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.shadowed += rhs.shadowed;
        self.stats += rhs.stats;
    }
}

fn main() {
    env_logger::init();
    let options = match cli_options::parse_args(std::env::args().collect()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\nusage: {}", message, CliOptions::message());
            std::process::exit(2);
        }
    };
    if options.help {
        println!("usage: {}", CliOptions::message());
        return;
    }

    let build_start = Instant::now();
    let resolution = (options.width, options.height);
    let scene = match preset::by_name(&options.scene_name, resolution, options.scene_options()) {
        Ok(scene) => scene,
        Err(message) => {
            eprintln!("{}\nusage: {}", message, CliOptions::message());
            std::process::exit(2);
        }
    };
    log::info!(
        "scene {} with {} objects built in {:.3?}",
        options.scene_name,
        scene.objects().len(),
        build_start.elapsed()
    );

    let trace_start = Instant::now();
    let summary = render(&scene, options.use_multi_thread);
    let num_pixels = options.width as usize * options.height as usize;
    println!(
        "{} of {} primary rays hit ({:.1}%), {} of them shadowed, traced in {:.3?}",
        summary.hits,
        num_pixels,
        100.0 * summary.hits as f64 / num_pixels as f64,
        summary.shadowed,
        trace_start.elapsed()
    );
    println!("traversal: {}", summary.stats);
}

/// Traces the primary ray of every pixel, then a shadow ray towards a distant light from every
/// hit point.
fn render(scene: &Scene, use_multi_thread: bool) -> RowSummary {
    let (_, height) = scene.camera.resolution();
    let progress = ProgressBar::new(height as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows [{elapsed_precise}]"),
    );

    let trace_and_count = |ctx: &mut TraceContext, row: u32| {
        let row_summary = trace_row(scene, row, ctx);
        progress.inc(1);
        row_summary
    };
    let summary = if use_multi_thread {
        (0..height)
            .into_par_iter()
            .map_init(TraceContext::new, trace_and_count)
            .reduce(RowSummary::default, |mut a, b| {
                a += b;
                a
            })
    } else {
        let mut ctx = TraceContext::new();
        let mut summary = RowSummary::default();
        for row in 0..height {
            summary += trace_and_count(&mut ctx, row);
        }
        summary
    };
    progress.finish();
    summary
}

fn trace_row(scene: &Scene, row: u32, ctx: &mut TraceContext) -> RowSummary {
    let light_dir = Vec3::new(1.0, 2.0, 1.5).hat();
    let (width, _) = scene.camera.resolution();
    let mut summary = RowSummary::default();
    for col in 0..width {
        let ray = match scene.camera.shoot_ray(row, col) {
            Some(ray) => ray,
            None => continue,
        };
        let isect = match scene.intersect(&ray, ctx) {
            Some(isect) => isect,
            None => continue,
        };
        summary.hits += 1;
        let shadow_ray = Ray::new(isect.point + isect.normal * SHADOW_BIAS, light_dir);
        if scene.shadow_hit(&shadow_ray, BOUND_HUGE, ctx).is_some() {
            summary.shadowed += 1;
        }
    }
    // Moves the counters out so that each row is accounted exactly once.
    summary.stats = std::mem::take(&mut ctx.stats);
    summary
}
