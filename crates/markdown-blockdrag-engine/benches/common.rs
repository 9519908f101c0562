// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// `items` top-level items, each carrying a chain of `depth` nested children
#[allow(dead_code)]
pub fn generate_outline(items: usize, depth: usize) -> String {
    let mut content = String::from("# Outline\n\nSome introductory paragraph.\n\n");
    for item in 0..items {
        content.push_str(&format!("- Item {item}\n"));
        for level in 1..=depth {
            content.push_str(&"\t".repeat(level));
            content.push_str(&format!("- Child {item}.{level}\n"));
        }
    }
    content
}

/// First line of the `item`-th top-level item in [`generate_outline`]
#[allow(dead_code)]
pub fn outline_item_line(item: usize, depth: usize) -> usize {
    5 + item * (depth + 1)
}
