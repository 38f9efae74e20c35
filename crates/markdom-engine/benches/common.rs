// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* **content** and `code`.\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// A document using every construct, with numbered headers, figures and
/// references so the resolution pass has work to do.
#[allow(dead_code)]
pub fn generate_full_document(sections: usize) -> String {
    let mut content = String::from("[TOC]\n\n[TOF]\n\n");

    for section in 0..sections {
        content.push_str(&format!("# Section {section}\n\n"));
        content.push_str(&format!(
            "Intro with ~~old~~ text, a [link](https://example.com/{section} \"Example\") \
             and a [reference][ref{section}].\n"
        ));
        content.push_str("Second row with **bold *and italics*** and $e^{i\\pi}$.\n\n");
        content.push_str(&format!("![Figure {section}](./fig{section}.png)\n\n"));
        content.push_str("> Quoted\n> twice\n\n");
        for i in 1..=3 {
            content.push_str(&format!("{i}. Item {i}\n"));
        }
        content.push_str("\n$$\n\\sum_{k=1}^{n} k\n$$\n\n---\n\n");
        content.push_str(&format!("[ref{section}]: https://example.com/ref \"Ref\"\n\n"));
    }

    content.push_str("[PAGEBREAK]\n");
    content
}

/// Unterminated constructs on every row, so most of the work is rollback.
#[allow(dead_code)]
pub fn generate_degraded_document(rows: usize) -> String {
    "Open **bold with *italics and [a link and `code\n".repeat(rows)
}
