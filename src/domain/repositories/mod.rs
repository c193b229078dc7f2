// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 只暴露抓取存储流程实际用到的能力，具体后端在基础设施层实现
pub mod page_cache;
pub mod page_repository;
