//! Schema for the goods admin tables
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "mall_category",
        r#"
        CREATE TABLE IF NOT EXISTS mall_category (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            keywords TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            pid INTEGER NOT NULL DEFAULT 0,
            icon_url TEXT NOT NULL DEFAULT '',
            pic_url TEXT NOT NULL DEFAULT '',
            level TEXT NOT NULL DEFAULT 'L1' CHECK (level IN ('L1', 'L2')),
            sort_order INTEGER NOT NULL DEFAULT 50,
            add_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            update_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "mall_brand",
        r#"
        CREATE TABLE IF NOT EXISTS mall_brand (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            pic_url TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL DEFAULT 50,
            floor_price NUMERIC(10, 2) NOT NULL DEFAULT 0,
            add_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            update_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "mall_goods",
        r#"
        CREATE TABLE IF NOT EXISTS mall_goods (
            id SERIAL PRIMARY KEY,
            goods_sn TEXT NOT NULL,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL DEFAULT 0,
            brand_id INTEGER NOT NULL DEFAULT 0,
            gallery TEXT[] NOT NULL DEFAULT '{}',
            keywords TEXT NOT NULL DEFAULT '',
            brief TEXT NOT NULL DEFAULT '',
            is_on_sale BOOLEAN NOT NULL DEFAULT TRUE,
            sort_order INTEGER NOT NULL DEFAULT 100,
            pic_url TEXT NOT NULL DEFAULT '',
            share_url TEXT NOT NULL DEFAULT '',
            is_new BOOLEAN NOT NULL DEFAULT FALSE,
            is_hot BOOLEAN NOT NULL DEFAULT FALSE,
            unit TEXT NOT NULL DEFAULT '',
            counter_price NUMERIC(10, 2) NOT NULL DEFAULT 0,
            retail_price NUMERIC(10, 2) NOT NULL DEFAULT 0,
            detail TEXT NOT NULL DEFAULT '',
            add_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            update_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "mall_goods_name_live",
        "CREATE UNIQUE INDEX IF NOT EXISTS mall_goods_name_live ON mall_goods (name) WHERE NOT deleted",
    ),
    (
        "mall_goods_sn_idx",
        "CREATE INDEX IF NOT EXISTS mall_goods_sn_idx ON mall_goods (goods_sn)",
    ),
    (
        "mall_goods_specification",
        r#"
        CREATE TABLE IF NOT EXISTS mall_goods_specification (
            id SERIAL PRIMARY KEY,
            goods_id INTEGER NOT NULL,
            specification TEXT NOT NULL,
            value TEXT NOT NULL,
            pic_url TEXT NOT NULL DEFAULT '',
            add_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            update_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "mall_goods_attribute",
        r#"
        CREATE TABLE IF NOT EXISTS mall_goods_attribute (
            id SERIAL PRIMARY KEY,
            goods_id INTEGER NOT NULL,
            attribute TEXT NOT NULL,
            value TEXT NOT NULL,
            add_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            update_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "mall_goods_product",
        r#"
        CREATE TABLE IF NOT EXISTS mall_goods_product (
            id SERIAL PRIMARY KEY,
            goods_id INTEGER NOT NULL,
            specifications TEXT[] NOT NULL,
            price NUMERIC(10, 2) NOT NULL,
            number INTEGER NOT NULL CHECK (number >= 0),
            url TEXT NOT NULL DEFAULT '',
            add_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            update_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "mall_goods_children_idx",
        r#"
        CREATE INDEX IF NOT EXISTS mall_goods_specification_goods_idx ON mall_goods_specification (goods_id);
        CREATE INDEX IF NOT EXISTS mall_goods_attribute_goods_idx ON mall_goods_attribute (goods_id);
        CREATE INDEX IF NOT EXISTS mall_goods_product_goods_idx ON mall_goods_product (goods_id)
        "#,
    ),
];

/// Create all tables and indexes that do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running goods schema migrations...");

    for (name, sql) in STATEMENTS {
        tracing::debug!(step = name, "applying");
        sqlx::raw_sql(sql).execute(pool).await?;
    }

    tracing::info!("goods schema migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_tracks_soft_deletes() {
        for (name, sql) in STATEMENTS {
            if sql.contains("CREATE TABLE") {
                assert!(sql.contains("deleted BOOLEAN"), "{name} lacks deleted flag");
            }
        }
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in STATEMENTS {
            for stmt in sql.split(';').filter(|s| !s.trim().is_empty()) {
                assert!(stmt.contains("IF NOT EXISTS"), "{name} is not idempotent");
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_run_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
