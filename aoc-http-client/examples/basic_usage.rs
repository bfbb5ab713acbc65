//! Basic usage example for the AOC HTTP client
//!
//! This example demonstrates how to:
//! - Create a client with default settings
//! - Create a client with a custom base URL and timeout (for testing)
//! - Scrape a puzzle page
//! - Fetch puzzle input
//!
//! Note: This example requires a valid AOC session cookie in `AOC_SESSION`.
//! You can get your session cookie from your browser's cookies after logging in to adventofcode.com

use aoc_http_client::AocClient;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let session = std::env::var("AOC_SESSION")?;

    // Example 1: Create a client with default settings
    println!("=== Example 1: Default Client ===");
    let client = AocClient::new(session.as_str())?;
    println!("✓ Client created with default base URL (https://adventofcode.com)");

    // Example 2: Custom base URL and timeout (useful against a mock server)
    println!("\n=== Example 2: Custom Base URL ===");
    let _custom_client = AocClient::builder()
        .session(session.as_str())
        .base_url("https://adventofcode.com")?
        .timeout(Duration::from_secs(10))
        .user_agent("basic-usage-example")
        .build()?;
    println!("✓ Client created with custom base URL and 10s timeout");

    let year = 2024;
    let day = 1;

    println!("\nScraping puzzle {} day {}...", year, day);
    match client.get_puzzle(year, day) {
        Ok(page) => {
            println!("✓ {} part(s) disclosed", page.questions.len());
            for (part, answer) in page.answers.iter().enumerate() {
                println!("  part {} answer: {}", part + 1, answer);
            }
        }
        Err(e) => println!("✗ Failed to scrape puzzle: {}", e),
    }

    println!("\nFetching input for year {} day {}...", year, day);
    match client.get_input(year, day) {
        Ok(input) => {
            println!("✓ Input fetched successfully");
            println!("Input length: {} bytes", input.len());
            println!("First 100 chars: {}", &input.chars().take(100).collect::<String>());
        }
        Err(e) => {
            println!("✗ Failed to fetch input: {}", e);
        }
    }

    Ok(())
}
