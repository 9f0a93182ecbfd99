//! Load Coordinator - Two-of-two join over independent async loads

use std::future::Future;

use futures_util::future::{select, Either};
use futures_util::pin_mut;

/// Wait for two fallible operations and resolve with both values.
///
/// The first failure settles the join. The other operation is dropped at
/// that point, so whatever it would have produced is never observed. Callers
/// that treat some errors as recoverable map them to values before handing
/// the futures in.
///
/// # Examples
///
/// ```ignore
/// let (baseline, derived) = join_both(repo.load_baseline(), repo.load_derived()).await?;
/// ```
pub async fn join_both<A, B, TA, TB, E>(first: A, second: B) -> Result<(TA, TB), E>
where
    A: Future<Output = Result<TA, E>>,
    B: Future<Output = Result<TB, E>>,
{
    pin_mut!(first);
    pin_mut!(second);

    match select(first, second).await {
        Either::Left((Ok(a), second)) => second.await.map(|b| (a, b)),
        Either::Left((Err(error), _)) => Err(error),
        Either::Right((Ok(b), first)) => first.await.map(|a| (a, b)),
        Either::Right((Err(error), _)) => Err(error),
    }
}
