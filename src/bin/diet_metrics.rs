//! Print a user's diet metrics and meal history
//! Usage: cargo run --bin diet_metrics -- <username>

use daily_diet::config::Config;
use daily_diet::models::{DietMetrics, Meal, User};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let username = match std::env::args().nth(1) {
        Some(name) => name,
        None => {
            eprintln!("Usage: diet_metrics <username>");
            std::process::exit(2);
        }
    };

    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let database = daily_diet::db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        daily_diet::db::migrations::run_migrations(conn)?;

        let user = match User::get_by_username(conn, &username)? {
            Some(u) => u,
            None => {
                println!("No user named {}", username);
                return Ok(());
            }
        };

        let meals = Meal::list_for_user_chronological(conn, &user.id)?;
        println!("{} meals for {}", meals.len(), user.username);

        let mut metrics = DietMetrics::new();
        for meal in &meals {
            metrics.push(meal.is_on_diet);
            println!(
                "  {}  {:<3}  streak {:>3}  {}",
                meal.date.format("%Y-%m-%d %H:%M"),
                if meal.is_on_diet { "on" } else { "off" },
                metrics.current_sequence(),
                meal.description
            );
        }

        println!();
        println!("Total meals:         {}", metrics.total_meals);
        println!("On diet:             {}", metrics.total_meals_on_diet);
        println!("Off diet:            {}", metrics.total_meals_off_diet);
        println!("Best on-diet streak: {}", metrics.best_on_diet_sequence);

        Ok(())
    })?;

    Ok(())
}
