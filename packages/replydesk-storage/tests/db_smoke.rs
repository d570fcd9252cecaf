use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use replydesk_config::Postgres;
use replydesk_storage::{
	Error,
	db::Db,
	models::{Business, Conversation, Lead, Message},
	queries::{businesses, conversations, leads},
};
use replydesk_testkit::TestDatabase;

async fn test_db() -> Option<(TestDatabase, Db)> {
	let Some(base_dsn) = replydesk_testkit::env_dsn() else {
		eprintln!("Skipping storage tests; set REPLYDESK_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, db))
}

fn business(business_id: &str, now: OffsetDateTime) -> Business {
	Business {
		business_id: business_id.to_string(),
		email: "owner@example.com".to_string(),
		business_name: "Jane's Salon".to_string(),
		phone: None,
		website_url: None,
		address: None,
		yelp_api_key: None,
		created_at: now,
		updated_at: now,
	}
}

fn lead(business_id: &str, status: &str, now: OffsetDateTime) -> Lead {
	Lead {
		lead_id: Uuid::new_v4(),
		business_id: business_id.to_string(),
		customer_name: "Jane".to_string(),
		email: "jane@x.com".to_string(),
		phone: None,
		message: "Do you have weekend slots?".to_string(),
		status: status.to_string(),
		source: "YELP".to_string(),
		created_at: now,
		updated_at: now,
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REPLYDESK_PG_DSN to run."]
async fn bootstrap_is_idempotent() {
	let Some((test_db, db)) = test_db().await else {
		return;
	};

	db.ensure_schema().await.expect("Second bootstrap must succeed.");

	for table in ["businesses", "leads", "conversations", "messages", "templates"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Missing table {table}.");
	}

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REPLYDESK_PG_DSN to run."]
async fn second_conversation_for_lead_is_rejected() {
	let Some((test_db, db)) = test_db().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();

	businesses::upsert_business(&db.pool, &business("b1", now)).await.expect("Insert business.");

	let lead = lead("b1", "NEW", now);

	leads::insert_lead(&db.pool, &lead).await.expect("Insert lead.");

	let first = Conversation {
		conversation_id: Uuid::new_v4(),
		lead_id: lead.lead_id,
		created_at: now,
		updated_at: now,
	};

	conversations::insert_conversation(&db.pool, &first).await.expect("Insert conversation.");

	let second = Conversation { conversation_id: Uuid::new_v4(), ..first.clone() };
	let err = conversations::insert_conversation(&db.pool, &second)
		.await
		.expect_err("Duplicate conversation must fail.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REPLYDESK_PG_DSN to run."]
async fn messages_list_in_insertion_order_on_equal_timestamps() {
	let Some((test_db, db)) = test_db().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();

	businesses::upsert_business(&db.pool, &business("b1", now)).await.expect("Insert business.");

	let lead = lead("b1", "NEW", now);

	leads::insert_lead(&db.pool, &lead).await.expect("Insert lead.");

	let conversation = Conversation {
		conversation_id: Uuid::new_v4(),
		lead_id: lead.lead_id,
		created_at: now,
		updated_at: now,
	};

	conversations::insert_conversation(&db.pool, &conversation).await.expect("Insert conversation.");

	for (sender, content) in [("CUSTOMER", "first"), ("AI", "second"), ("BUSINESS", "third")] {
		let message = Message {
			message_id: Uuid::new_v4(),
			conversation_id: conversation.conversation_id,
			content: content.to_string(),
			sender: sender.to_string(),
			created_at: now,
		};

		conversations::insert_message(&db.pool, &message).await.expect("Insert message.");
	}

	let messages = conversations::list_messages(&db.pool, conversation.conversation_id)
		.await
		.expect("List messages.");
	let contents = messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>();

	assert_eq!(contents, ["first", "second", "third"]);

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set REPLYDESK_PG_DSN to run."]
async fn mark_responded_leaves_closed_leads_alone() {
	let Some((test_db, db)) = test_db().await else {
		return;
	};
	let now = OffsetDateTime::now_utc();

	businesses::upsert_business(&db.pool, &business("b1", now)).await.expect("Insert business.");

	let open = lead("b1", "NEW", now);
	let closed = lead("b1", "CLOSED", now);

	leads::insert_lead(&db.pool, &open).await.expect("Insert lead.");
	leads::insert_lead(&db.pool, &closed).await.expect("Insert lead.");

	let later = now + Duration::minutes(5);
	let open = leads::mark_responded(&db.pool, open.lead_id, later)
		.await
		.expect("Mark responded.")
		.expect("Lead must exist.");
	let closed = leads::mark_responded(&db.pool, closed.lead_id, later)
		.await
		.expect("Mark responded.")
		.expect("Lead must exist.");

	assert_eq!(open.status, "RESPONDED");
	assert_eq!(closed.status, "CLOSED");

	let stale = leads::update_lead_status(&db.pool, open.lead_id, "NEW", "CLOSED", later)
		.await
		.expect("Update status.");

	assert!(stale.is_none(), "Compare-and-set must miss on a stale expected status.");

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
