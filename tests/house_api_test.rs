// ==========================================
// 宿舍楼生命周期 API 测试
// ==========================================
// 职责: 验证宿舍楼 CRUD、入住规划校验、级联删除、批量删除
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod house_api_test {
    use std::sync::Arc;

    use campus_residency::api::{ApiError, HouseApi, NoopInvalidator, PermissionChecker};
    use campus_residency::db;
    use campus_residency::domain::{Gender, NewRoomRequest, ResidencyType};

    use crate::test_helpers::{build_stack, create_test_db, house_request, plan};

    const ACTOR: &str = "test_user";

    // ==========================================
    // 创建与查询
    // ==========================================

    #[test]
    fn test_create_and_get_house() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let created = stack
            .house_api
            .create_house(ACTOR, house_request("Aster Hall", Gender::Both, plan(2, 16, 2, 16)))
            .unwrap();

        let fetched = stack
            .house_api
            .get_house_by_id(ACTOR, &created.house_id)
            .unwrap();
        assert_eq!(fetched.name, "Aster Hall");
        assert_eq!(fetched.house_gender, Gender::Both);
        assert_eq!(fetched.residency_type, ResidencyType::Boarding);
        // 入住规划 JSON 往返无损
        assert_eq!(fetched.occupancy_plan, created.occupancy_plan);

        let all = stack.house_api.get_houses(ACTOR).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_get_unknown_house_raises_not_found() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let result = stack.house_api.get_house_by_id(ACTOR, "missing");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_name_raises_unique_constraint() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        stack
            .house_api
            .create_house(ACTOR, house_request("Twin House", Gender::Male, plan(2, 16, 0, 0)))
            .unwrap();
        let result = stack
            .house_api
            .create_house(ACTOR, house_request("Twin House", Gender::Male, plan(2, 16, 0, 0)));
        assert!(matches!(result, Err(ApiError::UniqueConstraint(_))));
    }

    #[test]
    fn test_single_gender_house_rejects_opposite_sub_plan() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        // 男生楼带女生分桶 -> 拒绝
        let result = stack
            .house_api
            .create_house(ACTOR, house_request("Bad Plan House", Gender::Male, plan(2, 16, 1, 8)));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_plan_room_count_bounded_by_code_space() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        // 超出四位序号编码空间的规划被拒
        let result = stack
            .house_api
            .create_house(ACTOR, house_request("Vast House", Gender::Male, plan(10_000, 80_000, 0, 0)));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        // 编码空间内的最大值放行
        stack
            .house_api
            .create_house(ACTOR, house_request("Vast House", Gender::Male, plan(9_999, 79_992, 0, 0)))
            .unwrap();
    }

    // ==========================================
    // 更新
    // ==========================================

    #[test]
    fn test_update_house_replaces_plan() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let house = stack
            .house_api
            .create_house(ACTOR, house_request("Rose Hall", Gender::Female, plan(0, 0, 2, 16)))
            .unwrap();

        let mut request = campus_residency::api::UpdateHouseRequest {
            house_id: house.house_id.clone(),
            name: "Rose Hall Annex".to_string(),
            house_gender: Gender::Female,
            residency_type: ResidencyType::Mixed,
            occupancy_plan: plan(0, 0, 4, 32),
            house_master_id: Some("staff-42".to_string()),
        };
        let updated = stack.house_api.update_house(ACTOR, request.clone()).unwrap();
        assert_eq!(updated.name, "Rose Hall Annex");
        assert_eq!(updated.occupancy_plan.female_occupancy.room_count, 4);
        assert_eq!(updated.house_master_id.as_deref(), Some("staff-42"));

        // 不一致规划同样在更新时被拒
        request.occupancy_plan = plan(1, 8, 4, 32);
        let result = stack.house_api.update_house(ACTOR, request);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_update_does_not_reconcile_existing_rooms() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let house = stack
            .house_api
            .create_house(ACTOR, house_request("Shrink House", Gender::Male, plan(2, 20, 0, 0)))
            .unwrap();

        for _ in 0..2 {
            stack
                .room_api
                .create_room(
                    ACTOR,
                    NewRoomRequest {
                        house_id: house.house_id.clone(),
                        rm_gender: Gender::Male,
                        capacity: 10,
                    },
                )
                .unwrap();
        }

        // 收紧规划到 1 间: 更新成功，既有 2 间房保持原样
        let request = campus_residency::api::UpdateHouseRequest {
            house_id: house.house_id.clone(),
            name: house.name.clone(),
            house_gender: Gender::Male,
            residency_type: ResidencyType::Boarding,
            occupancy_plan: plan(1, 10, 0, 0),
            house_master_id: None,
        };
        stack.house_api.update_house(ACTOR, request).unwrap();
        assert_eq!(stack.room_repo.count_by_house(&house.house_id).unwrap(), 2);

        // 新建仍按新规划校验
        let result = stack.room_api.create_room(
            ACTOR,
            NewRoomRequest {
                house_id: house.house_id.clone(),
                rm_gender: Gender::Male,
                capacity: 1,
            },
        );
        assert!(matches!(result, Err(ApiError::RoomCountExceeded { .. })));
    }

    // ==========================================
    // 删除与级联
    // ==========================================

    #[test]
    fn test_delete_house_cascades_rooms() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let house = stack
            .house_api
            .create_house(ACTOR, house_request("Doomed House", Gender::Male, plan(2, 20, 0, 0)))
            .unwrap();
        let room = stack
            .room_api
            .create_room(
                ACTOR,
                NewRoomRequest {
                    house_id: house.house_id.clone(),
                    rm_gender: Gender::Male,
                    capacity: 4,
                },
            )
            .unwrap();

        stack.house_api.delete_house(ACTOR, &house.house_id).unwrap();

        assert_eq!(stack.room_repo.count_by_house(&house.house_id).unwrap(), 0);
        assert!(stack.room_repo.find_by_code(&room.code).unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_house_raises_not_found() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let result = stack.house_api.delete_house(ACTOR, "missing");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_bulk_delete_skips_unknown_ids() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let h1 = stack
            .house_api
            .create_house(ACTOR, house_request("House A", Gender::Male, plan(1, 8, 0, 0)))
            .unwrap();
        let h2 = stack
            .house_api
            .create_house(ACTOR, house_request("House B", Gender::Male, plan(1, 8, 0, 0)))
            .unwrap();
        stack
            .house_api
            .create_house(ACTOR, house_request("House C", Gender::Male, plan(1, 8, 0, 0)))
            .unwrap();

        let deleted = stack
            .house_api
            .bulk_delete_houses(
                ACTOR,
                &[h1.house_id.clone(), h2.house_id.clone(), "missing".to_string()],
            )
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(stack.house_api.get_houses(ACTOR).unwrap().len(), 1);
    }

    #[test]
    fn test_bulk_delete_empty_list_rejected() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let result = stack.house_api.bulk_delete_houses(ACTOR, &[]);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    // ==========================================
    // 入住规划形状漂移必须响亮失败
    // ==========================================

    #[test]
    fn test_tampered_occupancy_json_fails_loudly_on_read() {
        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let house = stack
            .house_api
            .create_house(ACTOR, house_request("Drift House", Gender::Male, plan(2, 16, 0, 0)))
            .unwrap();

        // 模拟存储数据形状漂移
        let conn = db::open_sqlite_connection(&db_path).unwrap();
        conn.execute(
            "UPDATE house SET occupancy_json = '{\"oops\": true}' WHERE house_id = ?1",
            [&house.house_id],
        )
        .unwrap();

        let result = stack.house_api.get_house_by_id(ACTOR, &house.house_id);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    // ==========================================
    // 权限
    // ==========================================

    #[test]
    fn test_permission_failure_surfaces_forbidden() {
        struct DenyAll;
        impl PermissionChecker for DenyAll {
            fn check_permissions(&self, _: &str, _: &[&str], _: bool) -> bool {
                false
            }
        }

        let (_temp_file, db_path) = create_test_db().unwrap();
        let stack = build_stack(&db_path);

        let gated_api = HouseApi::new(
            stack.house_repo.clone(),
            Arc::new(DenyAll),
            Arc::new(NoopInvalidator),
        );

        let result =
            gated_api.create_house(ACTOR, house_request("No Entry", Gender::Male, plan(1, 8, 0, 0)));
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let result = gated_api.get_houses(ACTOR);
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}
