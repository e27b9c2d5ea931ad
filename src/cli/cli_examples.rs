use super::cli_main::get_user_input;
use crate::Examples::titration_examples::titration_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Equilibrium of pure acid");
        println!("2. Equilibrium with excess of base");
        println!("3. pH curve (coarse grid)");
        println!("4. Conservation check");
        println!("5. Rate of reaction");
        println!("6. Fixed budget vs early stop");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush().ok();

        let choice = get_user_input();
        match choice.trim() {
            "1" => titration_examples(0),
            "2" => titration_examples(1),
            "3" => titration_examples(2),
            "4" => titration_examples(3),
            "5" => titration_examples(4),
            "6" => titration_examples(5),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
