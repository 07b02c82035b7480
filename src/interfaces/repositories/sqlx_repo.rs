use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxServiceRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxLeadRepo {
    pub pool: PgPool,
}

/// `%q%` for `ILIKE ... ESCAPE '\'`, with `q` matched literally.
pub(crate) fn contains_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
