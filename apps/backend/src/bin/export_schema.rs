//! Prints the GraphQL schema in SDL form, or writes it to the path given as
//! the first argument.

use std::path::Path;

use anyhow::Result;
use backend::build_schema;
use services::VideoService;

fn main() -> Result<()> {
    let schema = build_schema(VideoService::in_memory()).sdl();

    if let Some(target) = std::env::args().nth(1) {
        if let Some(parent) = Path::new(&target).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, schema)?;
    } else {
        println!("{}", schema);
    }

    Ok(())
}
