// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! ABI of the deployed crowdfunding contract. Only the entry points used by the client are
//! declared, each one as its own typed call.

use alloy::sol;

sol! {
    /// A campaign record, as stored by the contract.
    #[derive(Debug, PartialEq, Eq)]
    struct Campaign {
        address owner;
        string title;
        string description;
        uint256 target;
        uint256 deadline;
        uint256 amountCollected;
        string image;
        address[] donators;
        uint256[] donations;
        uint256 votes;
        string category;
        string website;
        string twitter;
        string linkedin;
        string documentLink;
    }

    /// The best-funded campaign of a category.
    #[derive(Debug, PartialEq, Eq)]
    struct CategoryWinner {
        string category;
        string title;
        address owner;
        uint256 amountCollected;
    }

    /// Emitted once per successful `createCampaign`.
    #[derive(Debug, PartialEq, Eq)]
    event CampaignCreated(uint256 indexed campaignId, address indexed owner, string title);

    #[derive(Debug, PartialEq, Eq)]
    function createCampaign(
        address owner,
        string title,
        string description,
        uint256 target,
        uint256 deadline,
        string image,
        string category,
        string website,
        string twitter,
        string linkedin,
        string documentLink
    ) external returns (uint256);

    function donateToCampaign(uint256 id) external payable;

    #[derive(Debug, PartialEq, Eq)]
    function getDonators(uint256 id)
        external
        view
        returns (address[] memory donators, uint256[] memory donations);

    function getCampaigns() external view returns (Campaign[] memory);

    function getWinnersByCategory() external view returns (CategoryWinner[] memory);
}

/// The arguments of `createCampaign`, in the contract's positional order.
pub type CreateCampaignArgs = createCampaignCall;

/// The two parallel arrays returned by `getDonators`.
pub type DonatorLists = getDonatorsReturn;
