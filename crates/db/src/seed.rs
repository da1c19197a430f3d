//! Sample content for fresh installations.

use helpcenter_core::article::ArticleKind;

use crate::models::error_article::CreateErrorArticle;
use crate::repositories::ErrorArticleRepo;
use crate::DbPool;

/// The articles inserted into an empty catalog.
pub fn sample_articles() -> Vec<CreateErrorArticle> {
    vec![
        CreateErrorArticle {
            kind: ArticleKind::Error,
            title: "You don't have permission to perform this action".into(),
            category: "roles-permissions".into(),
            short_description: Some("The user has no access to the selected module.".into()),
            customer_message: "You don't have permission to perform this action".into(),
            causes: vec![
                "The user has no role assigned.".into(),
                "The role does not grant access to that module.".into(),
                "The wrong business is selected.".into(),
            ],
            customer_steps: vec![
                "Sign out and sign back in.".into(),
                "Check the selected business.".into(),
                "Ask an administrator to review your role.".into(),
            ],
            support_steps: vec![
                "Review the role's permissions.".into(),
                "Confirm the business assignment.".into(),
            ],
            featured: true,
            ..CreateErrorArticle::default()
        },
        CreateErrorArticle {
            kind: ArticleKind::Error,
            title: "Blank screen after signing in".into(),
            category: "common-errors".into(),
            short_description: Some("Usually caused by a stale cache or an expired session.".into()),
            customer_message: "The screen stays blank after signing in.".into(),
            causes: vec![
                "Outdated browser cache.".into(),
                "Expired user session.".into(),
            ],
            customer_steps: vec![
                "Hard refresh with Ctrl + F5.".into(),
                "Sign out and sign back in.".into(),
                "Try another browser.".into(),
            ],
            featured: true,
            ..CreateErrorArticle::default()
        },
    ]
}

/// Insert [`sample_articles`] when the table is empty.
///
/// Returns the number of inserted rows (0 when content already exists).
pub async fn seed_sample_articles(pool: &DbPool) -> Result<usize, sqlx::Error> {
    if ErrorArticleRepo::count(pool).await? > 0 {
        return Ok(0);
    }

    let samples = sample_articles();
    for input in &samples {
        ErrorArticleRepo::create(pool, input).await?;
    }
    tracing::info!(count = samples.len(), "Seeded sample articles");
    Ok(samples.len())
}
