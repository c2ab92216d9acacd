use std::sync::Arc;

use stagecraft::actors::Puppet;
use stagecraft::animations::{animate, Cast, Descriptor, Options, Repeat, TimelineEvent};
use stagecraft::clock::FrameClock;
use stagecraft::pause;

#[stagecraft::runtime]
async fn main() {
    let clock = Arc::new(FrameClock::default());
    clock.start().unwrap();

    let first = Puppet::new("first").with_property("top", 0);
    let second = Puppet::new("second").with_property("top", 0);

    // Both puppets bounce one after the other, twice.
    let scene = animate(
        clock.clone(),
        Cast::ensemble([first.clone(), second.clone()]),
        vec![
            Descriptor::new(200).with_property("top", 50),
            Descriptor::new(200).with_property("top", 0),
        ],
        Options::default()
            .set_repeat(Repeat::Count(2))
            .set_auto_play(true),
    );

    scene.on(TimelineEvent::OnRepeat, |_: Option<Box<dyn stagecraft::actors::Actor>>| {
        println!("Second round");
    });

    for _ in 0..8 {
        pause!(200);
        println!("{} / {}", first, second);
    }

    // Running it backwards from where it stopped.
    scene.reverse();
    pause!(400);
    println!("{} / {}", first, second);

    scene.detach();
    clock.stop();
}
