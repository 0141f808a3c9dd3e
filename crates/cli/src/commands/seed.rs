//! Seed database with sample catalog data.
//!
//! Inserts a small set of categories and meals (with stock) plus a demo
//! wallet, enough to exercise every endpoint from a fresh database.
//!
//! # Usage
//!
//! ```bash
//! canteen-cli seed          # upsert sample rows
//! canteen-cli seed --fresh  # wipe catalog and wallet tables first
//! ```

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use super::migrate::MigrationError;

struct SeedMeal {
    id: i32,
    category_id: i32,
    title: &'static str,
    // price in paise, scaled to two decimal places on insert
    price_minor: i64,
    image_url: &'static str,
    stock: i32,
}

const CATEGORIES: &[(i32, &str, &str)] = &[
    (1, "Breakfast", "#8a2b06"),
    (2, "Lunch", "#2b8a06"),
    (3, "Snacks", "#062b8a"),
    (4, "Beverages", "#8a062b"),
];

const MEALS: &[SeedMeal] = &[
    SeedMeal {
        id: 1,
        category_id: 1,
        title: "Masala Dosa",
        price_minor: 4000,
        image_url: "/images/masala-dosa.jpg",
        stock: 25,
    },
    SeedMeal {
        id: 2,
        category_id: 1,
        title: "Idli Sambar",
        price_minor: 3000,
        image_url: "/images/idli-sambar.jpg",
        stock: 40,
    },
    SeedMeal {
        id: 3,
        category_id: 2,
        title: "Veg Thali",
        price_minor: 8000,
        image_url: "/images/veg-thali.jpg",
        stock: 30,
    },
    SeedMeal {
        id: 4,
        category_id: 2,
        title: "Paneer Biryani",
        price_minor: 9500,
        image_url: "/images/paneer-biryani.jpg",
        stock: 20,
    },
    SeedMeal {
        id: 5,
        category_id: 3,
        title: "Samosa",
        price_minor: 1500,
        image_url: "/images/samosa.jpg",
        stock: 60,
    },
    SeedMeal {
        id: 6,
        category_id: 4,
        title: "Masala Chai",
        price_minor: 1000,
        image_url: "/images/masala-chai.jpg",
        stock: 100,
    },
];

const DEMO_USER: &str = "demo";
const DEMO_BALANCE_MINOR: i64 = 50_000;

/// Seed the canteen database with sample data.
///
/// # Errors
///
/// Returns [`MigrationError`] if the database URL is missing or any
/// insert fails.
pub async fn run(fresh: bool) -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = super::migrate::database_url()?;
    let pool = canteen_server::db::create_pool(&database_url).await?;

    if fresh {
        info!("Wiping catalog and wallet tables...");
        sqlx::query("TRUNCATE meal_categories, meals, categories, wallet CASCADE")
            .execute(&pool)
            .await?;
    }

    seed_catalog(&pool).await?;
    seed_wallet(&pool).await?;

    info!("Seeding complete!");
    Ok(())
}

async fn seed_catalog(pool: &PgPool) -> Result<(), MigrationError> {
    for (id, title, color) in CATEGORIES {
        sqlx::query(
            r"
            INSERT INTO categories (id, title, color)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title, color = EXCLUDED.color
            ",
        )
        .bind(id)
        .bind(title)
        .bind(color)
        .execute(pool)
        .await?;
    }
    info!("Seeded {} categories", CATEGORIES.len());

    for meal in MEALS {
        sqlx::query(
            r"
            INSERT INTO meals (id, title, price, image_url, stock)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
                stock = EXCLUDED.stock
            ",
        )
        .bind(meal.id)
        .bind(meal.title)
        .bind(Decimal::new(meal.price_minor, 2))
        .bind(meal.image_url)
        .bind(meal.stock)
        .execute(pool)
        .await?;

        sqlx::query(
            r"
            INSERT INTO meal_categories (meal_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(meal.id)
        .bind(meal.category_id)
        .execute(pool)
        .await?;
    }
    info!("Seeded {} meals", MEALS.len());

    Ok(())
}

async fn seed_wallet(pool: &PgPool) -> Result<(), MigrationError> {
    sqlx::query(
        r"
        INSERT INTO wallet (user_id, balance)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET balance = EXCLUDED.balance
        ",
    )
    .bind(DEMO_USER)
    .bind(Decimal::new(DEMO_BALANCE_MINOR, 2))
    .execute(pool)
    .await?;

    info!("Seeded demo wallet for user '{DEMO_USER}'");
    Ok(())
}
