//! vdb demo
//!
//! Draws a labelled spiral and a triangle fan to a running viewer. An
//! optional argument names a TOML or JSON config file.

use std::f32::consts::TAU;

use tracing_subscriber::EnvFilter;
use vdb_client::{Vdb, VdbConfig, VdbResult};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => VdbConfig::load(path)?,
        None => VdbConfig::default(),
    };

    let mut vdb = Vdb::with_config(&config)?;
    if let Err(e) = vdb.ensure_connected() {
        tracing::warn!("no viewer at {}: {}", config.address, e);
        return Ok(());
    }
    if let Err(e) = draw(&mut vdb) {
        if e.is_terminal() {
            tracing::warn!("viewer connection lost: {}", e);
        } else {
            tracing::warn!("demo stopped early: {}", e);
        }
    }
    Ok(())
}

fn draw(vdb: &mut Vdb) -> VdbResult<()> {
    vdb.frame()?;

    vdb.batch(|vdb| {
        vdb.label("spiral")?;
        vdb.color(0.2, 0.6, 1.0)?;
        let points: Vec<[f32; 3]> = (0..200)
            .map(|i| {
                let t = i as f32 / 200.0;
                let angle = t * 4.0 * TAU;
                [t * angle.cos(), t * angle.sin(), t]
            })
            .collect();
        vdb.points(&points)
    })?;

    vdb.batch(|vdb| {
        vdb.line_label("fan")?;
        vdb.color(1.0, 0.5, 0.0)?;
        let segments = 12;
        for i in 0..segments {
            let a0 = i as f32 / segments as f32 * TAU;
            let a1 = (i + 1) as f32 / segments as f32 * TAU;
            vdb.triangle(
                [0.0, 0.0, -0.5],
                [a0.cos(), a0.sin(), -0.5],
                [a1.cos(), a1.sin(), -0.5],
            )?;
            vdb.normal(0.0, 0.0, -0.5, 0.0, 0.0, 1.0)?;
        }
        Ok(())
    })?;

    // Only a tenth of the noisy samples make it through
    for i in 0..100 {
        if vdb.set_sample(0.1) {
            tracing::trace!("sample {} kept", i);
        }
        let x = i as f32 / 100.0;
        vdb.line(x, -1.0, 0.0, x, -1.2, 0.0)?;
    }
    vdb.set_sample(1.0);

    Ok(())
}
