use std::sync::Arc;

use stagecraft::actors::{Actor, Puppet};
use stagecraft::animations::{animate, Cast, Descriptor, Easing, Options, TimelineEvent};
use stagecraft::clock::FrameClock;
use stagecraft::pause;

#[stagecraft::runtime]
async fn main() {
    let clock = Arc::new(FrameClock::new(60));
    clock.start().unwrap();

    let puppet = Puppet::new("box")
        .with_property("left", 0)
        .with_property("opacity", 0.0);

    // Fade in, wait a bit, then slide to the right: each descriptor starts when the previous ends.
    let scene = animate(
        clock.clone(),
        Cast::solo(puppet.clone()),
        vec![
            Descriptor::new(400)
                .with_property("opacity", 1.0)
                .set_easing(Easing::SineIn),
            Descriptor::new(600)
                .set_delay(200)
                .with_property("left", 300)
                .set_easing(Easing::CubicInOut),
        ],
        Options::default().set_auto_play(true),
    );

    scene.on(TimelineEvent::OnComplete, |actor: Option<Box<dyn Actor>>| {
        if let Some(actor) = actor {
            println!("Complete: {}", actor);
        }
    });

    for _ in 0..6 {
        pause!(250);
        println!("{}", puppet);
    }

    clock.stop();
}
