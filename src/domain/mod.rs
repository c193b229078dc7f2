// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含：
/// - 领域模型（models）：抓取任务和页面
/// - 仓库接口（repositories）：页面持久化与页面缓存的最小能力接口
/// - 服务（services）：抓取并存储页面的业务流程
pub mod models;
pub mod repositories;
pub mod services;
