use crate::entities::{Rental, RentalKind, RentalStatus};
use serde::{Deserialize, Serialize};

type Predicate<'a> = Box<dyn Fn(&Rental) -> bool + 'a>;

/// Search criteria for rental records.
///
/// Each populated field narrows the result; an empty field matches anything.
/// The movie title matches as a case-insensitive substring, every other
/// field must be equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalFilter {
    pub movie: Option<String>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub user_id: Option<i32>,
    pub kind: Option<RentalKind>,
    pub status: Option<RentalStatus>,
}

impl RentalFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn movie(mut self, movie: impl Into<String>) -> Self {
        self.movie = Some(movie.into());
        self
    }

    pub fn month(mut self, month: i32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn kind(mut self, kind: RentalKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: RentalStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builds one predicate per populated field.
    fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates: Vec<Predicate<'_>> = Vec::new();

        if let Some(needle) = &self.movie {
            let needle = needle.to_lowercase();
            predicates.push(Box::new(move |rental| {
                rental
                    .movie
                    .as_deref()
                    .is_some_and(|movie| movie.to_lowercase().contains(&needle))
            }));
        }
        if let Some(month) = self.month {
            predicates.push(Box::new(move |rental| rental.month == Some(month)));
        }
        if let Some(year) = self.year {
            predicates.push(Box::new(move |rental| rental.year == Some(year)));
        }
        if let Some(user_id) = self.user_id {
            predicates.push(Box::new(move |rental| rental.user_id() == Some(user_id)));
        }
        if let Some(kind) = self.kind {
            predicates.push(Box::new(move |rental| rental.kind == Some(kind)));
        }
        if let Some(status) = self.status {
            predicates.push(Box::new(move |rental| rental.status == Some(status)));
        }

        predicates
    }

    pub fn matches(&self, rental: &Rental) -> bool {
        self.predicates().iter().all(|predicate| predicate(rental))
    }

    pub fn apply(&self, rentals: Vec<Rental>) -> Vec<Rental> {
        let predicates = self.predicates();
        rentals
            .into_iter()
            .filter(|rental| predicates.iter().all(|predicate| predicate(rental)))
            .collect()
    }
}
