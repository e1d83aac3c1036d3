use movie_core::db::migrations::latest_version;
use movie_core::db::open_db_in_memory;
use movie_core::{MovieRecord, MovieRepository, RepoError, SqliteMovieRepository};
use rusqlite::Connection;

#[test]
fn create_and_list_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    let movie = MovieRecord::new("Inception", 2010, 8.8).with_poster("https://img.example/i.jpg");
    repo.create(&movie).unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all, vec![movie]);
}

#[test]
fn missing_poster_roundtrips_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    repo.create(&MovieRecord::new("Memento", 2000, 8.4)).unwrap();
    let loaded = repo.get("Memento").unwrap().unwrap();
    assert_eq!(loaded.poster_url, None);
    assert_eq!(loaded.year, 2000);
    assert_eq!(loaded.rating, 8.4);
}

#[test]
fn duplicate_title_is_rejected_without_state_change() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    repo.create(&MovieRecord::new("Dune", 2021, 8.0)).unwrap();
    let err = repo
        .create(&MovieRecord::new("Dune", 1984, 6.3))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateKey(ref title) if title == "Dune"));

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].year, 2021);
    assert_eq!(all[0].rating, 8.0);
}

#[test]
fn titles_are_case_sensitive_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    repo.create(&MovieRecord::new("Up", 2009, 8.3)).unwrap();
    repo.create(&MovieRecord::new("UP", 2009, 8.3)).unwrap();
    assert_eq!(repo.list_all().unwrap().len(), 2);
    assert!(matches!(repo.delete("up"), Err(RepoError::NotFound(_))));
}

#[test]
fn delete_existing_and_missing_titles() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    repo.create(&MovieRecord::new("Heat", 1995, 8.3)).unwrap();
    repo.create(&MovieRecord::new("Ronin", 1998, 7.2)).unwrap();

    repo.delete("Heat").unwrap();
    let titles: Vec<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|movie| movie.title)
        .collect();
    assert_eq!(titles, vec!["Ronin".to_string()]);

    let err = repo.delete("Never Existed").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref title) if title == "Never Existed"));
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

#[test]
fn update_rating_changes_only_rating() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    let original = MovieRecord::new("Alien", 1979, 8.5).with_poster("https://img.example/a.jpg");
    repo.create(&original).unwrap();
    repo.update_rating("Alien", 9.1).unwrap();

    let loaded = repo.get("Alien").unwrap().unwrap();
    assert_eq!(
        loaded,
        MovieRecord {
            rating: 9.1,
            ..original
        }
    );
}

#[test]
fn update_missing_title_reports_not_found_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    repo.create(&MovieRecord::new("Alien", 1979, 8.5)).unwrap();
    let err = repo.update_rating("Aliens", 2.0).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ref title) if title == "Aliens"));
    assert_eq!(repo.get("Alien").unwrap().unwrap().rating, 8.5);
}

#[test]
fn list_is_ordered_by_title() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    for title in ["Zodiac", "Amelie", "Memento"] {
        repo.create(&MovieRecord::new(title, 2000, 7.0)).unwrap();
    }

    let titles: Vec<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|movie| movie.title)
        .collect();
    assert_eq!(titles, vec!["Amelie", "Memento", "Zodiac"]);
}

#[test]
fn list_reports_storage_failure_instead_of_empty_result() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE movies;").unwrap();

    assert!(matches!(repo.list_all(), Err(RepoError::Db(_))));
    assert!(matches!(
        repo.create(&MovieRecord::new("Heat", 1995, 8.3)),
        Err(RepoError::Db(_))
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteMovieRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_movies_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteMovieRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("movies"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE movies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT UNIQUE NOT NULL,
            year INTEGER NOT NULL,
            rating REAL NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteMovieRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "movies",
            column: "poster_url"
        })
    ));
}
