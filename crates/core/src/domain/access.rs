/// Verdict for an attempt to edit or delete a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAccess {
    /// The actor is the comment's author.
    Granted,
    /// Another authenticated user; the comment is reported as missing so
    /// its existence never leaks to non-owners.
    Hidden,
    /// No authenticated actor; the caller is sent to the login page.
    LoginRequired,
}

/// Only the author of a comment may mutate it.
pub fn comment_mutation_access(actor: Option<i64>, author_id: i64) -> MutationAccess {
    match actor {
        None => MutationAccess::LoginRequired,
        Some(id) if id == author_id => MutationAccess::Granted,
        Some(_) => MutationAccess::Hidden,
    }
}
