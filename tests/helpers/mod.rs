// Test Helper Modules
//
// Shared infrastructure for contract and integration tests.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;
//
// Example:
//   #[actix_web::test]
//   async fn test_list_users() {
//       let db = MemoryDb::new();
//       let app = init_app(&db).await;
//
//       let req = get_as(TENANT_A_KEY, "/users");
//       let resp = test::call_service(&app, req).await;
//       assert!(resp.status().is_success());
//   }

#![allow(dead_code)]

pub mod memory;

pub use memory::*;
pub use test_app::*;
pub use test_data::*;
pub use test_database::*;
