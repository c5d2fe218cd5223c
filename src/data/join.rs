use std::collections::HashMap;

use super::model::{Genre, JoinedMovie, Movie};

/// Attach a genre name to every movie whose `genre_id` is in `genres`.
///
/// Inner join: movies without a `genre_id`, or with one that no genre
/// carries, are dropped. Output keeps the order of `movies`. If `genres`
/// repeats an identifier, the first record wins.
pub fn join_genres(movies: &[Movie], genres: &[Genre]) -> Vec<JoinedMovie> {
    let mut names: HashMap<i64, &str> = HashMap::with_capacity(genres.len());
    for genre in genres {
        names.entry(genre.id).or_insert(genre.name.as_str());
    }

    let joined: Vec<JoinedMovie> = movies
        .iter()
        .filter_map(|movie| {
            let name = names.get(&movie.genre_id?)?;
            Some(JoinedMovie {
                movie: movie.clone(),
                genre: name.to_string(),
            })
        })
        .collect();

    log::debug!(
        "Joined {} of {} movies against {} genres",
        joined.len(),
        movies.len(),
        genres.len()
    );
    joined
}
