//! Display functions for command results

use super::formatters::{code_label, create_progress_bar, format_codes, format_sizes};
use crate::commands::{AnalysisReport, StrategyInfo, VerifyReport};
use crate::progress::ProgressMessage;
use crate::solver::TreeResult;
use crate::symmetry::PrefixEntry;
use colored::Colorize;
use std::path::Path;

fn header(title: &str, detail: &str) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        title.bright_cyan().bold(),
        detail.bright_yellow().bold()
    );
    println!("{}", "═".repeat(60).cyan());
}

/// Print the result of a tree build
pub fn print_build_result(result: &TreeResult, output: Option<&Path>) {
    header("TREE BUILD:", &result.strategy);

    let Some(tree) = &result.tree else {
        println!(
            "\n{}",
            format!("❌ No tree within {} guesses", result.max_levels)
                .red()
                .bold()
        );
        println!(
            "   Solver entries:   {} in {:.2}s",
            result.metrics.entry_count, result.metrics.elapsed_secs
        );
        return;
    };
    let stats = tree.stats();

    println!("\n🌳 {}", "Tree:".bright_cyan().bold());
    println!("   Root guess:       {}", code_label(tree.root()).bright_yellow());
    println!("   Secrets:          {}", stats.problem_size);
    println!("   Total moves:      {}", stats.total_moves);
    println!(
        "   Average length:   {}",
        format!("{:.4}", stats.average_game_length())
            .bright_yellow()
            .bold()
    );
    println!(
        "   Depth:            {} to {} (budget {})",
        stats.min_depth.to_string().green(),
        stats.max_depth.to_string().yellow(),
        result.max_levels
    );
    println!("   Nodes:            {}", tree.node_count());

    println!("\n⏱  {}", "Search:".bright_cyan().bold());
    println!("   Solver entries:   {}", result.metrics.entry_count);
    println!("   Time taken:       {:.2}s", result.metrics.elapsed_secs);
    if let Some(first) = result.metrics.first_guess {
        println!("   Fixed first:      {}", code_label(first));
    }

    println!("\n📈 {}", "Games by length:".bright_cyan().bold());
    let lengths = tree.game_lengths();
    let total = stats.problem_size.max(1) as f64;
    for (moves, &count) in lengths.iter().enumerate().skip(1) {
        if count == 0 {
            continue;
        }
        let pct = count as f64 / total * 100.0;
        let bar = create_progress_bar(pct, 100.0, 40);
        println!("   {moves:2}: {} {count:5} ({pct:5.1}%)", bar.green());
    }

    if let Some(path) = output {
        println!("\n💾 Written to {}", path.display().to_string().bright_white());
    }
}

/// Print the strategy catalog
pub fn print_strategies(strategies: &[StrategyInfo]) {
    header("STRATEGIES", "");
    for info in strategies {
        println!(
            "   {:24} {:20} {}",
            info.name.bright_yellow(),
            info.evaluator.cyan(),
            info.description.bright_black()
        );
    }
}

/// Print partition statistics for each analyzed guess
pub fn print_analysis_report(report: &AnalysisReport, verbose: bool) {
    header(
        "PARTITION ANALYSIS:",
        &format!("{} guesses vs {} codes", report.guesses.len(), report.problem_size),
    );

    if report.guesses.len() <= 20 || verbose {
        for g in &report.guesses {
            let s = &g.stats;
            println!(
                "\n🎯 {} {}",
                code_label(g.guess).bright_yellow().bold(),
                if s.in_solution { "(possible secret)".green() } else { "".normal() }
            );
            println!("   Parts:    {:3}   Largest: {:4}   Smallest: {}", s.n, s.largest, s.smallest);
            println!(
                "   Entropy:  [{}] {:.3} bits",
                create_progress_bar(s.entropy, 4.0, 24).green(),
                s.entropy
            );
            println!("   Mean:     {:.2}  Sigma: {:.2}", s.mean, s.sigma());
            println!("   Sizes:    {}", format_sizes(&g.sizes));
        }
    }

    println!("\n🔗 {}", "Signature classes:".bright_cyan().bold());
    for class in &report.classes {
        let lead = class.members[0];
        println!(
            "   {:14} {:5} members  largest {:4}  {}",
            code_label(lead).bright_yellow(),
            class.members.len(),
            class.signature.sizes.first().copied().unwrap_or(0),
            format_sizes(&class.signature.sizes).bright_black()
        );
    }
}

/// Print distinct prefixes, one per line: length, preserving size, distinct size, prefix
pub fn print_prefixes(entries: &[PrefixEntry]) {
    for entry in entries {
        println!(
            "{} {:5} {:4} {}",
            entry.prefix.len(),
            entry.preserving.len(),
            entry.distinct.len(),
            format_codes(&entry.prefix)
        );
    }
}

/// Print a tree verification report
pub fn print_verify_report(report: &VerifyReport) {
    header("TREE VERIFICATION", "");
    println!("   Nodes checked:    {}", report.nodes_checked);
    println!("   Secrets solved:   {}", report.solved);
    println!("   Deepest game:     {}", report.max_depth);

    println!();
    if report.is_ok() {
        println!("{}", "✅ Tree is consistent".green().bold());
    } else {
        println!(
            "{}",
            format!("❌ {} mismatches", report.mismatches.len()).red().bold()
        );
        for m in &report.mismatches {
            println!("   {m}");
        }
    }
}

/// Print one progress message, outermost node first
pub fn print_progress_message(msg: &ProgressMessage) {
    println!(
        "{} {}",
        msg.name.bright_yellow(),
        format!("entries={}", msg.total).cyan()
    );
    for (depth, frame) in msg.frames.iter().rev().enumerate() {
        println!("   {depth:2} {frame}");
    }
}
