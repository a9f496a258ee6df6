use musifly_lib::{create_specta_builder, BINDINGS_PATH};
use specta_typescript::Typescript;

fn main() {
    let builder = create_specta_builder();

    builder
        .export(
            Typescript::default().header("// @ts-nocheck"),
            BINDINGS_PATH,
        )
        .expect("Failed to export TypeScript bindings");

    println!("TypeScript bindings exported successfully!");
}
