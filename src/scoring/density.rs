use crate::scoring::hotness::posts_norm;

/// Content volume, on the same scale as the posts term of hotness.
pub fn density(posts: u64) -> f64 {
    posts_norm(posts)
}
