use console::style;

pub fn success(message: &str) {
    println!("{} {message}", style("✓").green());
}

pub fn warning(message: &str) {
    println!("{} {message}", style("!").yellow());
}

pub fn note(message: &str) {
    println!("  {message}");
}
