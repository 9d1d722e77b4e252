//! tests for the policy layer
//!
//! these tests drive policies end to end against an in-memory store

use std::sync::LazyLock;

use tollgate_db::{GrantFilter, GrantStore, StaticScope, TollgateDb};
use tollgate_grants::{
    ActionRegistry, ArgumentError, Enforcer, Error, Grant, Policy, Selection, Verdict,
};
use tollgate_types::{Actor, ActorSet, Identifiable, Identity, SegmentId};

#[derive(Debug, Clone, PartialEq)]
struct Post {
    id: i64,
    title: &'static str,
}

impl Identifiable for Post {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone)]
struct User {
    id: i64,
    groups: Vec<i64>,
    admin: bool,
}

impl User {
    fn plain(id: i64) -> Self {
        Self {
            id,
            groups: Vec::new(),
            admin: false,
        }
    }
}

impl Identity for User {
    fn actor(&self) -> Actor {
        Actor::new("User", self.id)
    }
}

fn posts() -> StaticScope<Post> {
    StaticScope::new(vec![
        Post { id: 1, title: "hello" },
        Post { id: 2, title: "locked" },
        Post { id: 3, title: "drafts" },
    ])
}

static POST_ACTIONS: LazyLock<ActionRegistry> = LazyLock::new(|| {
    ActionRegistry::builder()
        .general("create", 1)
        .general("view", 2)
        .on_object("view", 2)
        .on_object("edit", 3)
        .on_object("delete", 4)
        .build()
});

struct PostPolicy {
    user: User,
    scope: StaticScope<Post>,
}

impl PostPolicy {
    fn new(user: User) -> Self {
        Self {
            user,
            scope: posts(),
        }
    }
}

impl Policy for PostPolicy {
    type Actor = User;
    type Object = Post;
    type Scope = StaticScope<Post>;

    fn registry() -> &'static ActionRegistry {
        &POST_ACTIONS
    }

    fn actor(&self) -> &User {
        &self.user
    }

    fn model_scope(&self) -> &StaticScope<Post> {
        &self.scope
    }

    fn namespace() -> String {
        "Post".to_string()
    }

    fn actors(&self) -> ActorSet {
        ActorSet::from(self.user.actor()).with_ids("Group", self.user.groups.iter().copied())
    }

    fn unrestricted(&self) -> bool {
        self.user.admin
    }

    fn check(&self, action: &str, object: Option<&Post>) -> Verdict {
        match (action, object) {
            ("delete", Some(post)) if post.title == "locked" => Verdict::Deny,
            ("view", Some(post)) if post.title == "hello" => Verdict::Allow,
            _ => Verdict::Defer,
        }
    }

    fn select(&self, action: &str) -> Selection {
        // user 99 is a moderator of the locked post
        if action == "edit" && self.user.id == 99 {
            Selection::Only(vec![2])
        } else {
            Selection::Defer
        }
    }
}

/// a second policy inheriting the post actions and adding one of its own
static ARCHIVE_ACTIONS: LazyLock<ActionRegistry> =
    LazyLock::new(|| ActionRegistry::extend(&POST_ACTIONS).general("purge", 9).build());

struct ArchivePolicy {
    user: User,
    scope: StaticScope<Post>,
    segment: i64,
}

impl Policy for ArchivePolicy {
    type Actor = User;
    type Object = Post;
    type Scope = StaticScope<Post>;

    fn registry() -> &'static ActionRegistry {
        &ARCHIVE_ACTIONS
    }

    fn actor(&self) -> &User {
        &self.user
    }

    fn model_scope(&self) -> &StaticScope<Post> {
        &self.scope
    }

    fn segment_id(&self) -> SegmentId {
        SegmentId(self.segment)
    }
}

async fn setup_test_db() -> TollgateDb {
    TollgateDb::new_in_memory().await.unwrap()
}

async fn total_grants(db: &TollgateDb) -> u64 {
    db.count_general_grants(&GrantFilter::new()).await.unwrap()
        + db.count_object_grants(&GrantFilter::new()).await.unwrap()
}

#[tokio::test]
async fn test_grant_check_revoke_through_policy() {
    let db = setup_test_db().await;
    let post = Post { id: 3, title: "drafts" };

    let enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    enforcer.grant("create", None).await.unwrap();
    enforcer.grant("edit", Some(&post)).await.unwrap();

    let mut fresh = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(fresh.can("create", None).await.unwrap());
    assert!(fresh.can("edit", Some(&post)).await.unwrap());
    assert!(!fresh.can("delete", Some(&post)).await.unwrap());

    assert_eq!(enforcer.revoke("edit", Some(&post)).await.unwrap(), 1);
    let mut fresh = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(!fresh.can("edit", Some(&post)).await.unwrap());
    assert!(fresh.can("create", None).await.unwrap());
}

#[tokio::test]
async fn test_argument_errors_leave_store_untouched() {
    let db = setup_test_db().await;
    let post = Post { id: 1, title: "hello" };
    let mut enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);

    let err = enforcer.can("publish", None).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Argument(ArgumentError::UnknownAction { ref action, ref policy })
            if action == "publish" && policy == "PostPolicy"
    ));

    let err = enforcer.can("create", Some(&post)).await.unwrap_err();
    assert!(matches!(err, Error::Argument(ArgumentError::UnexpectedObject { .. })));

    let err = enforcer.can("edit", None).await.unwrap_err();
    assert!(matches!(err, Error::Argument(ArgumentError::MissingObject { .. })));

    let err = enforcer.list("create").await.unwrap_err();
    assert!(matches!(err, Error::Argument(ArgumentError::NotListable { .. })));

    let err = enforcer.grant("edit", None).await.unwrap_err();
    assert!(matches!(err, Error::Argument(ArgumentError::MissingObject { .. })));

    let err = enforcer.revoke("create", Some(&post)).await.unwrap_err();
    assert!(matches!(err, Error::Argument(ArgumentError::UnexpectedObject { .. })));

    assert_eq!(total_grants(&db).await, 0);
}

#[tokio::test]
async fn test_inherited_actors_count_for_checks_only() {
    let db = setup_test_db().await;
    let post = Post { id: 3, title: "drafts" };

    Grant::new(&db, Actor::new("Group", 4))
        .unwrap()
        .grant(3, "Post", Some(3))
        .await
        .unwrap();

    let member = User {
        id: 7,
        groups: vec![4, 5],
        admin: false,
    };
    let mut enforcer = Enforcer::new(PostPolicy::new(member.clone()), &db);
    assert!(enforcer.can("edit", Some(&post)).await.unwrap());
    assert_eq!(enforcer.list("edit").await.unwrap(), vec![post.clone()]);

    let mut outsider = Enforcer::new(PostPolicy::new(User::plain(8)), &db);
    assert!(!outsider.can("edit", Some(&post)).await.unwrap());

    // writes go to the user, never to the groups
    enforcer.grant("create", None).await.unwrap();
    let group_rows = db
        .count_general_grants(&GrantFilter::new().actors(ActorSet::new().with_ids("Group", [4, 5])))
        .await
        .unwrap();
    assert_eq!(group_rows, 0);
    let user_rows = db
        .count_general_grants(&GrantFilter::new().actors(member.actor()))
        .await
        .unwrap();
    assert_eq!(user_rows, 1);
}

#[tokio::test]
async fn test_revoke_leaves_inherited_actors_alone() {
    let db = setup_test_db().await;
    let member = User {
        id: 7,
        groups: vec![4],
        admin: false,
    };
    let group = Actor::new("Group", 4);

    Grant::new(&db, group.clone())
        .unwrap()
        .grant(1, "Post", None)
        .await
        .unwrap();
    let enforcer = Enforcer::new(PostPolicy::new(member.clone()), &db);
    enforcer.grant("create", None).await.unwrap();

    assert_eq!(enforcer.revoke("create", None).await.unwrap(), 1);

    let user_rows = db
        .count_general_grants(&GrantFilter::new().actors(member.actor()))
        .await
        .unwrap();
    assert_eq!(user_rows, 0);
    let group_rows = db
        .count_general_grants(&GrantFilter::new().actors(group))
        .await
        .unwrap();
    assert_eq!(group_rows, 1);

    // the group grant still counts for the member
    let mut fresh = Enforcer::new(PostPolicy::new(member), &db);
    assert!(fresh.can("create", None).await.unwrap());
}

#[tokio::test]
async fn test_name_registered_as_general_and_on_object() {
    let db = setup_test_db().await;
    let drafts = Post { id: 3, title: "drafts" };

    let enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    enforcer.grant("view", None).await.unwrap();

    let mut fresh = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(fresh.can("view", None).await.unwrap());
    // the general grant says nothing about one post
    assert!(!fresh.can("view", Some(&drafts)).await.unwrap());

    enforcer.grant("view", Some(&drafts)).await.unwrap();
    let mut fresh = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(fresh.can("view", Some(&drafts)).await.unwrap());
    assert_eq!(fresh.list("view").await.unwrap(), vec![drafts.clone()]);

    let filter = GrantFilter::new().actors(Actor::new("User", 7)).action(2);
    assert_eq!(db.count_general_grants(&filter).await.unwrap(), 1);
    assert_eq!(db.count_object_grants(&filter).await.unwrap(), 1);

    assert_eq!(enforcer.revoke("view", None).await.unwrap(), 1);
    let mut fresh = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(!fresh.can("view", None).await.unwrap());
    assert!(fresh.can("view", Some(&drafts)).await.unwrap());
}

#[tokio::test]
async fn test_unrestricted_actor_bypasses_grants() {
    let db = setup_test_db().await;
    let admin = User {
        id: 1,
        groups: Vec::new(),
        admin: true,
    };
    let mut enforcer = Enforcer::new(PostPolicy::new(admin), &db);

    assert!(enforcer.can("create", None).await.unwrap());
    let drafts = Post { id: 3, title: "drafts" };
    assert!(enforcer.can("delete", Some(&drafts)).await.unwrap());
    assert_eq!(enforcer.list("view").await.unwrap().len(), 3);

    // arguments are still validated
    assert!(enforcer.can("publish", None).await.is_err());

    assert_eq!(total_grants(&db).await, 0);
}

#[tokio::test]
async fn test_custom_check_runs_before_unrestricted() {
    let db = setup_test_db().await;
    let admin = User {
        id: 1,
        groups: Vec::new(),
        admin: true,
    };
    let locked = Post { id: 2, title: "locked" };
    let mut enforcer = Enforcer::new(PostPolicy::new(admin.clone()), &db);

    assert!(!enforcer.can("delete", Some(&locked)).await.unwrap());
    // a deferred check still takes the unrestricted shortcut
    assert!(enforcer.can("edit", Some(&locked)).await.unwrap());

    // a custom selection wins over unrestricted listing too
    let moderator = User { id: 99, ..admin };
    let mut enforcer = Enforcer::new(PostPolicy::new(moderator), &db);
    assert_eq!(
        enforcer.list("edit").await.unwrap(),
        vec![Post { id: 2, title: "locked" }]
    );
    assert_eq!(enforcer.list("view").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_custom_check_overrides_grants() {
    let db = setup_test_db().await;
    let hello = Post { id: 1, title: "hello" };
    let locked = Post { id: 2, title: "locked" };

    let enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    enforcer.grant("delete", Some(&locked)).await.unwrap();

    let mut enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    // denied despite the grant
    assert!(!enforcer.can("delete", Some(&locked)).await.unwrap());
    // allowed without one
    assert!(enforcer.can("view", Some(&hello)).await.unwrap());
    // falls through to grants
    assert!(!enforcer.can("view", Some(&locked)).await.unwrap());
}

#[tokio::test]
async fn test_listing_intersects_scope() {
    let db = setup_test_db().await;
    let grant = Grant::new(&db, Actor::new("User", 7)).unwrap();
    grant.grant(2, "Post", Some(3)).await.unwrap();
    grant.grant(2, "Post", Some(1)).await.unwrap();
    // outside the scope
    grant.grant(2, "Post", Some(42)).await.unwrap();

    let mut enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    let ids: Vec<i64> = enforcer
        .list("view")
        .await
        .unwrap()
        .iter()
        .map(Identifiable::id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(enforcer.list("edit").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_selection_replaces_listing() {
    let db = setup_test_db().await;
    Grant::new(&db, Actor::new("User", 99))
        .unwrap()
        .grant(3, "Post", Some(1))
        .await
        .unwrap();

    let mut enforcer = Enforcer::new(PostPolicy::new(User::plain(99)), &db);
    let listed = enforcer.list("edit").await.unwrap();
    assert_eq!(listed, vec![Post { id: 2, title: "locked" }]);
}

#[tokio::test]
async fn test_enforcer_checks_share_memo() {
    let db = setup_test_db().await;
    let mut enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(!enforcer.can("create", None).await.unwrap());

    enforcer.grant("create", None).await.unwrap();

    // same enforcer still holds the earlier answer
    assert!(!enforcer.can("create", None).await.unwrap());
    let mut fresh = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(fresh.can("create", None).await.unwrap());
}

#[tokio::test]
async fn test_inherited_registry_and_default_namespace() {
    let db = setup_test_db().await;
    let archive = ArchivePolicy {
        user: User::plain(7),
        scope: posts(),
        segment: 12,
    };
    let enforcer = Enforcer::new(archive, &db);
    enforcer.grant("purge", None).await.unwrap();
    enforcer.grant("create", None).await.unwrap();

    // stored under the policy's own type name, in its segment
    let stored = db
        .count_general_grants(
            &GrantFilter::new()
                .segment(SegmentId(12))
                .object_type("ArchivePolicy"),
        )
        .await
        .unwrap();
    assert_eq!(stored, 2);

    // post policies know nothing about purge
    let mut posts_enforcer = Enforcer::new(PostPolicy::new(User::plain(7)), &db);
    assert!(matches!(
        posts_enforcer.can("purge", None).await,
        Err(Error::Argument(ArgumentError::UnknownAction { .. }))
    ));

    // other segments do not see the grants
    let mut other_segment = Enforcer::new(
        ArchivePolicy {
            user: User::plain(7),
            scope: posts(),
            segment: 13,
        },
        &db,
    );
    assert!(!other_segment.can("purge", None).await.unwrap());
}
