use serde::Deserialize;
use stanza::Config;

#[derive(Debug, Deserialize)]
struct Graphics {
    resolution: Vec<i64>,
    refresh_rate: i64,
}

fn main() -> Result<(), stanza::Error> {
    let mut config = Config::new();
    config.parse("demos/settings.cfg")?;

    // Typed per-key access, missing-safe along the whole chain.
    let name = config.section("app").get::<String>("name")?;
    println!("App: {}", name.unwrap_or_default());

    let port = config
        .section("network")
        .child("server")
        .get::<u16>("port")?;
    println!("Server port: {port:?}");

    // A whole section mapped onto a struct.
    let graphics: Option<Graphics> = config.section("graphics").deserialize()?;
    println!("Graphics: {graphics:?}");

    // Every property of a section decoded under one type.
    let spawns = config.section("spawn_points").get_all::<(i64, i64, i64)>()?;
    for (label, point) in &spawns {
        println!("spawn {label}: {point:?}");
    }

    Ok(())
}
