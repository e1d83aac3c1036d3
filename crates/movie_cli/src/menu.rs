//! Interactive menu loop.
//!
//! # Responsibility
//! - Map menu choices to catalog service calls.
//! - Turn every outcome, including errors, into a printed message.
//!
//! # Invariants
//! - No catalog or storage error ends the loop; only `0` or EOF does.

use crate::prompt::Prompter;
use movie_core::{
    format_rating, write_page, AddSource, AppConfig, CatalogError, CatalogService, MovieLookup,
    MovieRecord, MovieRepository, RepoError,
};
use std::io::{BufRead, Write};

const LINE_WIDTH: usize = 45;
const MIN_DOTS: usize = 3;

const MENU: &str = "
  Menu:
  0. Exit
  1. List movies
  2. Add movie
  3. Delete movie
  4. Update movie
  5. Stats
  6. Random movie
  7. Search movie
  8. Movies sorted by rating
  9. Generate website";

/// Runs the menu until the user exits or input closes.
pub fn run<Repo, Lookup, R, W>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
    config: &AppConfig,
) where
    Repo: MovieRepository,
    Lookup: MovieLookup,
    R: BufRead,
    W: Write,
{
    prompter.say("\n  ==============================");
    prompter.say("   RETRO MOVIE DATABASE");
    prompter.say("  ==============================");

    loop {
        prompter.say(MENU);
        let Some(choice) = prompter.ask("\n  Enter choice (0-9): ") else {
            return;
        };

        match choice.as_str() {
            "0" => {
                prompter.say("\n  Bye! See you next time.");
                return;
            }
            "1" => list_movies(service, prompter),
            "2" => add_movie(service, prompter),
            "3" => delete_movie(service, prompter),
            "4" => update_movie(service, prompter),
            "5" => show_stats(service, prompter),
            "6" => random_movie(service, prompter),
            "7" => search_movies(service, prompter),
            "8" => sorted_movies(service, prompter),
            "9" => generate_website(service, prompter, config),
            _ => prompter.say("  Invalid choice. Try again."),
        }

        if prompter.ask("\n  Press enter to return to the menu").is_none() {
            return;
        }
    }
}

/// Formats `" Title (Year) ...... rating"` padded to a fixed width.
pub fn format_movie_line(movie: &MovieRecord) -> String {
    let label = format!(" {} ({})", movie.title, movie.year);
    let value = format!(" {}", format_rating(movie.rating));
    let used = label.chars().count() + value.chars().count();
    let dots = LINE_WIDTH.saturating_sub(used).max(MIN_DOTS);
    format!("{label} {}{value}", ".".repeat(dots))
}

fn report<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, err: &CatalogError) {
    let message = match err {
        CatalogError::Repo(RepoError::DuplicateKey(title)) => {
            format!("  Movie '{title}' already exists.")
        }
        CatalogError::Repo(RepoError::NotFound(title)) => format!("  Movie '{title}' not found."),
        CatalogError::Repo(other) => format!("  Database error: {other}"),
        other => format!("  {}.", capitalize(&other.to_string())),
    };
    prompter.say(message);
}

fn list_movies<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    match service.list_movies() {
        Ok(movies) if movies.is_empty() => prompter.say("\n  No movies in database yet."),
        Ok(movies) => {
            prompter.say(format!("\n  {} movies in total:\n", movies.len()));
            for movie in &movies {
                prompter.say(format_movie_line(movie));
            }
        }
        Err(err) => report(prompter, &err),
    }
}

fn add_movie<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    prompter.say("\n  ADD MOVIE");
    let Some(title) = prompter.ask("\n  Enter movie name: ") else {
        return;
    };
    if title.is_empty() {
        prompter.say("  Title cannot be empty.");
        return;
    }

    if service.lookup_available() {
        prompter.say(format!("\n  Searching OMDb for '{title}'..."));
    }
    match service.enrich_and_add(&title, &mut *prompter) {
        Ok(outcome) => {
            let movie = &outcome.record;
            if outcome.source == AddSource::Lookup {
                prompter.say(format!(
                    "\n  Found: {} ({}) - Rating: {}",
                    movie.title,
                    movie.year,
                    format_rating(movie.rating)
                ));
            }
            prompter.say(format!("  Movie '{}' added successfully.", movie.title));
        }
        Err(err) => report(prompter, &err),
    }
}

fn delete_movie<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    prompter.say("\n  DELETE MOVIE");
    let Some(title) = prompter.ask("\n  Enter movie name to delete: ") else {
        return;
    };
    match service.delete_movie(&title) {
        Ok(()) => prompter.say(format!("  Movie '{title}' deleted successfully.")),
        Err(err) => report(prompter, &err),
    }
}

fn update_movie<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    prompter.say("\n  UPDATE MOVIE");
    let Some(title) = prompter.ask("\n  Enter movie name: ") else {
        return;
    };
    if title.is_empty() {
        prompter.say("  Title cannot be empty.");
        return;
    }
    let Some(rating) = prompter.ask_rating(service.limits()) else {
        return;
    };
    match service.update_rating(&title, rating) {
        Ok(()) => prompter.say(format!("  Movie '{title}' updated successfully.")),
        Err(err) => report(prompter, &err),
    }
}

fn show_stats<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    match service.compute_stats() {
        Ok(stats) => {
            prompter.say("\n  STATISTICS");
            prompter.say(format!("  Average rating: {:.1}", stats.average_rating));
            prompter.say(format!(
                "  Best movie: {} ({})",
                stats.best.title,
                format_rating(stats.best.rating)
            ));
            prompter.say(format!(
                "  Worst movie: {} ({})",
                stats.worst.title,
                format_rating(stats.worst.rating)
            ));
        }
        Err(CatalogError::EmptyCatalog) => prompter.say("\n  No movies to show stats for."),
        Err(err) => report(prompter, &err),
    }
}

fn random_movie<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    match service.pick_random() {
        Ok(movie) => prompter.say(format!(
            "\n  Random pick: {} ({}) - Rating: {}",
            movie.title,
            movie.year,
            format_rating(movie.rating)
        )),
        Err(CatalogError::EmptyCatalog) => prompter.say("\n  No movies available."),
        Err(err) => report(prompter, &err),
    }
}

fn search_movies<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    let Some(query) = prompter.ask("\n  Enter search term: ") else {
        return;
    };
    if query.is_empty() {
        return;
    }
    match service.search(&query) {
        Ok(found) if found.is_empty() => {
            prompter.say(format!("  No movies found matching '{query}'."));
        }
        Ok(found) => {
            for movie in &found {
                prompter.say(format_movie_line(movie));
            }
        }
        Err(err) => report(prompter, &err),
    }
}

fn sorted_movies<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
) {
    match service.sorted_by_rating(true) {
        Ok(movies) if movies.is_empty() => prompter.say("\n  No movies to sort."),
        Ok(movies) => {
            prompter.say("\n  MOVIES SORTED BY RATING:\n");
            for movie in &movies {
                prompter.say(format_movie_line(movie));
            }
        }
        Err(err) => report(prompter, &err),
    }
}

fn generate_website<Repo: MovieRepository, Lookup: MovieLookup, R: BufRead, W: Write>(
    service: &CatalogService<Repo, Lookup>,
    prompter: &mut Prompter<R, W>,
    config: &AppConfig,
) {
    let template = match std::fs::read_to_string(&config.template_path) {
        Ok(template) => template,
        Err(err) => {
            log::warn!("event=site_generate module=cli status=error error_code=template_unreadable error={err}");
            prompter.say(format!(
                "  Template not found: {}",
                config.template_path.display()
            ));
            return;
        }
    };

    let html = match service.render_static_page(&template, &config.page_title) {
        Ok(html) => html,
        Err(err) => {
            report(prompter, &err);
            return;
        }
    };

    match write_page(&config.output_path, &html) {
        Ok(()) => {
            log::info!("event=site_generate module=cli status=ok bytes={}", html.len());
            prompter.say("\n  Website was generated successfully.");
            prompter.say(format!("  Open {} to view it.", config.output_path.display()));
        }
        Err(err) => prompter.say(format!(
            "  Could not write {}: {err}",
            config.output_path.display()
        )),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_movie_line, run};
    use crate::prompt::Prompter;
    use movie_core::db::open_db_in_memory;
    use movie_core::{
        AppConfig, CatalogService, LookupError, LookupRecord, MovieLookup, MovieRecord,
        MovieRepository, NoLookup, SqliteMovieRepository, ValidationLimits,
    };
    use std::io::Cursor;

    struct FixedLookup;

    impl MovieLookup for FixedLookup {
        fn fetch(&self, _title: &str) -> Result<LookupRecord, LookupError> {
            Ok(LookupRecord {
                title: "Heat".to_string(),
                year: 1995,
                rating: 8.0,
                poster_url: None,
            })
        }
    }

    #[test]
    fn movie_line_is_padded_with_dots() {
        let line = format_movie_line(&MovieRecord::new("Heat", 1995, 8.3));
        assert_eq!(line.chars().count(), 46);
        assert!(line.starts_with(" Heat (1995) ...."));
        assert!(line.ends_with(". 8.3"));
    }

    #[test]
    fn long_titles_keep_minimum_dots() {
        let title = "A".repeat(60);
        let line = format_movie_line(&MovieRecord::new(title, 2000, 5.0));
        assert!(line.ends_with(" ... 5.0"));
    }

    #[test]
    fn menu_session_adds_lists_and_reports_errors() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteMovieRepository::try_new(&conn).unwrap();
        let service = CatalogService::new(repo, NoLookup, ValidationLimits::default());
        let script = [
            "2", "Heat", "1995", "8.3", "", // add manually
            "2", "Heat", "1995", "8.3", "", // duplicate
            "3", "Ronin", "",               // delete missing
            "5", "",                        // stats
            "0",
        ]
        .join("\n");
        let mut prompter = Prompter::new(Cursor::new(script.into_bytes()), Vec::new());

        run(&service, &mut prompter, &AppConfig::default());

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert!(output.contains("Movie 'Heat' added successfully."));
        assert!(output.contains("Movie 'Heat' already exists."));
        assert!(output.contains("Movie 'Ronin' not found."));
        assert!(output.contains("Best movie: Heat (8.3)"));
        assert!(!output.contains("Searching OMDb"));
        assert!(output.contains("Bye!"));

        let repo = SqliteMovieRepository::try_new(&conn).unwrap();
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn lookup_session_announces_search_and_keeps_decimal() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteMovieRepository::try_new(&conn).unwrap();
        let service = CatalogService::new(repo, FixedLookup, ValidationLimits::default());
        let script = ["2", "heat", "", "1", "", "0"].join("\n");
        let mut prompter = Prompter::new(Cursor::new(script.into_bytes()), Vec::new());

        run(&service, &mut prompter, &AppConfig::default());

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert!(output.contains("Searching OMDb for 'heat'..."));
        assert!(output.contains("Found: Heat (1995) - Rating: 8.0"));
        assert!(output.contains(". 8.0\n"));
    }
}
