// src/store.rs

use std::{fmt, str::FromStr, time::Duration};

use sqlx::{
    QueryBuilder, Sqlite, SqlitePool,
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    error::AppError,
    models::{
        comment::{Comment, NewComment},
        question::{NewAnswer, NewQuestion, Question, QuestionOrder},
    },
};

/// Ids bound per `IN (...)` list, far below SQLite's variable limit.
const COMMENT_BATCH: usize = 500;

const QUESTION_COLUMNS: &str = "id, text, image_path, answer, answer_image_path, answered_by, role, upvotes, downvotes";

#[derive(Debug)]
pub enum StoreError {
    /// A write referenced a question id that does not exist.
    MissingQuestion(i64),
    Database(sqlx::Error),
    Migration(MigrateError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::MissingQuestion(id) => write!(f, "Question {} not found", id),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Migration(e) => write!(f, "Migration error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<MigrateError> for StoreError {
    fn from(err: MigrateError) -> Self {
        StoreError::Migration(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingQuestion(id) => AppError::NotFound(format!("Question {} not found", id)),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

/// Handle to the question board database.
///
/// Cheap to clone; every clone shares the same connection pool.
/// Each operation is a single statement committed on its own.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if missing) the SQLite database at `database_url`
    /// and brings its schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied successfully.");

        Ok(Self { pool })
    }

    pub async fn insert_question(&self, new: NewQuestion) -> Result<Question, StoreError> {
        let sql = format!(
            "INSERT INTO questions (text, image_path) VALUES (?, ?) RETURNING {}",
            QUESTION_COLUMNS
        );

        let question = sqlx::query_as::<_, Question>(&sql)
            .bind(new.text)
            .bind(new.image_path)
            .fetch_one(&self.pool)
            .await?;

        Ok(question)
    }

    pub async fn get_question(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let sql = format!("SELECT {} FROM questions WHERE id = ?", QUESTION_COLUMNS);

        let question = sqlx::query_as::<_, Question>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(question)
    }

    /// All questions, answered or not.
    pub async fn list_questions(&self, order: QuestionOrder) -> Result<Vec<Question>, StoreError> {
        let order_by = match order {
            QuestionOrder::Upvotes => "upvotes DESC, id ASC",
            QuestionOrder::Oldest => "id ASC",
        };
        let sql = format!("SELECT {} FROM questions ORDER BY {}", QUESTION_COLUMNS, order_by);

        let questions = sqlx::query_as::<_, Question>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(questions)
    }

    /// Questions still waiting for an answer, oldest first.
    pub async fn list_unanswered(&self) -> Result<Vec<Question>, StoreError> {
        let sql = format!(
            "SELECT {} FROM questions WHERE answer IS NULL ORDER BY id ASC",
            QUESTION_COLUMNS
        );

        let questions = sqlx::query_as::<_, Question>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(questions)
    }

    /// Inserts a comment. Fails with `MissingQuestion` when the owning
    /// question does not exist; nothing is written in that case.
    pub async fn insert_comment(&self, new: NewComment) -> Result<Comment, StoreError> {
        let question_id = new.question_id;

        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (text, question_id) VALUES (?, ?) RETURNING id, text, question_id",
        )
        .bind(new.text)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                StoreError::MissingQuestion(question_id)
            }
            other => StoreError::Database(other),
        })
    }

    /// Comments owned by any of `question_ids`, in submission order.
    /// Ids are queried in batches so any number of questions can be listed.
    pub async fn comments_for(&self, question_ids: &[i64]) -> Result<Vec<Comment>, StoreError> {
        let mut comments = Vec::new();

        for batch in question_ids.chunks(COMMENT_BATCH) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "SELECT id, text, question_id FROM comments WHERE question_id IN (",
            );
            let mut separated = builder.separated(", ");
            for id in batch {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            let found = builder
                .build_query_as::<Comment>()
                .fetch_all(&self.pool)
                .await?;
            comments.extend(found);
        }

        comments.sort_by_key(|c| c.id);
        Ok(comments)
    }

    /// Adds one upvote and returns the new count, `None` if no such question.
    pub async fn upvote(&self, id: i64) -> Result<Option<i64>, StoreError> {
        let upvotes = sqlx::query_scalar::<_, i64>(
            "UPDATE questions SET upvotes = upvotes + 1 WHERE id = ? RETURNING upvotes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(upvotes)
    }

    /// Adds one downvote and returns the new count, `None` if no such question.
    pub async fn downvote(&self, id: i64) -> Result<Option<i64>, StoreError> {
        let downvotes = sqlx::query_scalar::<_, i64>(
            "UPDATE questions SET downvotes = downvotes + 1 WHERE id = ? RETURNING downvotes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(downvotes)
    }

    /// Records an answer, moving the question out of the unanswered list.
    /// Returns `None` if no such question.
    pub async fn answer_question(
        &self,
        id: i64,
        answer: NewAnswer,
    ) -> Result<Option<Question>, StoreError> {
        let sql = format!(
            r#"
            UPDATE questions
            SET answer = ?,
                answered_by = ?,
                role = ?,
                answer_image_path = COALESCE(?, answer_image_path)
            WHERE id = ?
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );

        let question = sqlx::query_as::<_, Question>(&sql)
            .bind(answer.answer)
            .bind(answer.answered_by)
            .bind(answer.role)
            .bind(answer.answer_image_path)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(question)
    }
}
