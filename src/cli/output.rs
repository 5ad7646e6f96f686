//! Output formatting for CLI

use crate::{gridworld::Gridworld, pipeline::TrainingResult};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{}:", key), value);
}

/// Print the layout, one row per line
pub fn print_grid(world: &Gridworld) {
    for row in world.char_grid() {
        let line: String = row.iter().map(|c| format!("{c} ")).collect();
        println!("  {}", line.trim_end());
    }
}

/// Print the aggregate numbers of a run
pub fn print_result(result: &TrainingResult) {
    print_kv("Model", &result.model);
    print_kv("Policy", &result.policy);
    print_kv("Episodes", &result.episodes.to_string());
    print_kv(
        "Reached destination",
        &format!(
            "{} ({:.1}%)",
            result.successes,
            result.success_rate * 100.0
        ),
    );
    print_kv("Mean steps", &format!("{:.2}", result.mean_steps));
    print_kv("Mean reward", &format!("{:.3}", result.mean_reward));
    print_kv(
        "Mean discounted return",
        &format!("{:.3}", result.mean_discounted_return),
    );
    if let Some(epsilon) = result.final_epsilon {
        print_kv("Final epsilon", &format!("{epsilon:.4}"));
    }
}
