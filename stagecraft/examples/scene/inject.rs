use std::sync::Arc;

use stagecraft::actors::Puppet;
use stagecraft::animations::{animate, Cast, Descriptor, Options};
use stagecraft::clock::FrameClock;
use stagecraft::pause;

#[stagecraft::runtime]
async fn main() {
    let clock = Arc::new(FrameClock::default());
    clock.start().unwrap();

    let puppet = Puppet::new("box").with_property("left", 0);
    let scene = animate(
        clock.clone(),
        Cast::solo(puppet.clone()),
        vec![Descriptor::new(1000).with_property("left", 500)],
        Options::default().set_auto_play(true),
    );

    pause!(400);
    println!("Before: {}", puppet);

    // Changes course mid-flight: the running pose is clipped and the new one starts from here.
    scene.set_animation(Descriptor::new(500).with_property("left", 0));
    println!("{}", scene);

    pause!(250);
    println!("Halfway back: {}", puppet);

    // Animated seek 200ms backwards, then resume to the end.
    scene.seek_animate(-200.0);
    pause!(300);
    println!("Rewound: {}", puppet);

    scene.play();
    pause!(600);
    println!("After: {}", puppet);

    clock.stop();
}
