use super::cli_examples::examples_menu;
use super::cli_titration::{rate_of_reaction_menu, titration_menu};
use std::io::{self, Write};
pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => titration_menu(),
            "2" => rate_of_reaction_menu(),
            "3" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to TitraKin: acid-base equilibrium of an antacid\n
    added to hydrochloric acid, pH curves and rate of reaction \n \x1b[0m"
    );
    println!("\x1b[33m1. Titration (equilibrium and pH curve)\x1b[0m");
    println!("\x1b[33m2. Rate of reaction\x1b[0m");
    println!("\x1b[33m3. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush().ok();
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        // closed stdin ends every menu
        return "0".to_string();
    }
    if input.is_empty() {
        return "0".to_string();
    }
    input
}
