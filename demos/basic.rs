//! Standalone demo: a horizontal and a vertical slider sharing one value.

use floem::prelude::*;
use floem::reactive::SignalGet;
use floem::window::WindowConfig;
use floem_stepper::{step_slider, Axis, SliderConfig, SliderProps};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let props = SliderProps::from_config(
        SliderConfig::default()
            .with_range(0.0, 100.0)
            .with_step(5.0)
            .with_value(40.0),
    );

    floem::Application::new()
        .window(
            move |_| {
                h_stack((
                    step_slider(props, Axis::Vertical).style(|s| s.height(200.0)),
                    v_stack((
                        step_slider(props, Axis::Horizontal).style(|s| s.width(200.0)),
                        label(move || format!("{:.0}", props.value.get())),
                    ))
                    .style(|s| s.gap(8.0)),
                ))
                .style(|s| s.gap(16.0).padding(16.0))
                .on_event_stop(floem::event::EventListener::WindowClosed, |_| {
                    floem::quit_app()
                })
            },
            Some(
                WindowConfig::default()
                    .size((280.0, 240.0))
                    .title("floem-stepper"),
            ),
        )
        .run();
}
