//! Scrolling Page Demo
//!
//! Simulates a brochure page scrolling past the viewport:
//! - a hero headline revealed word by word with a stagger
//! - three content sections using different motion presets
//!
//! Styles are printed as the scheduler ticks, so the staggered delays and
//! threshold crossings are visible in the log.
//!
//! Run with: cargo run -p inview_reveal --example scrolling_page

use anyhow::Result;
use inview_reveal::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let probe = Arc::new(BoundsProbe::new(Rect::new(0.0, 0.0, 1280.0, 720.0)));
    let observer = ViewportObserver::new(probe.clone());
    let scheduler = TransitionScheduler::new();
    let ids = ElementIdGenerator::new();

    // Page layout: the headline sits above the fold, the sections below it
    let headline = ids.next();
    probe.update_bounds(headline, Rect::new(100.0, 200.0, 1080.0, 120.0));

    let sections = [
        (ids.next(), "services", "fade-up", 900.0),
        (ids.next(), "portfolio", "slide-left", 1500.0),
        (ids.next(), "contact", "scale", 2100.0),
    ];
    for (id, _, _, top) in &sections {
        probe.update_bounds(*id, Rect::new(100.0, *top, 1080.0, 400.0));
    }

    let _text = text_reveal("We help brands find their voice through design, strategy, and innovation.")
        .mount(&observer, &scheduler.handle(), headline, |index, style| {
            if style.opacity >= 1.0 {
                println!("word {index} fully revealed");
            }
        })?;

    let mut regions = Vec::new();
    for (id, name, preset, _) in sections {
        let region = reveal()
            .preset(preset)
            .delay_ms(100.0)
            .mount(&observer, &scheduler.handle(), id, move |style| {
                if style.opacity >= 1.0 {
                    println!("section `{name}` fully revealed");
                }
            })?;
        regions.push(region);
    }

    // Scroll the page in 60px steps, ticking the scheduler at 60fps
    for step in 0..40 {
        let scroll_y = step as f32 * 60.0;
        probe.set_viewport(Rect::new(0.0, scroll_y, 1280.0, 720.0));
        for _ in 0..4 {
            scheduler.tick(16.0);
        }
    }

    // Let the last transitions finish
    while scheduler.tick(16.0) {}

    for region in &regions {
        println!(
            "final state {:?}, style {:?}",
            region.state(),
            region.style()
        );
    }

    Ok(())
}
