//! Contract interfaces for the chain-A side of the bridge, defined inline via
//! [`alloy_sol_types::sol!`] rather than loaded from an external ABI file.

use alloy_sol_types::sol;

sol! {
    /// Minimal ERC-20 surface used to recognize transfers and read balances.
    #[derive(Debug)]
    interface IERC20 {
        function transfer(address recipient, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);

        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

sol! {
    /// The M-of-N multisig wallet that holds locked chain-A funds and releases
    /// them once enough owners have confirmed a submitted transaction.
    #[derive(Debug)]
    interface IMultiSigWallet {
        function submitTransaction(address destination, uint256 value, bytes calldata data) external returns (uint256 transactionId);
        function confirmTransaction(uint256 transactionId) external;
        function executeTransaction(uint256 transactionId) external;
        function confirmations(uint256 transactionId, address owner) external view returns (bool);
        function isConfirmed(uint256 transactionId) external view returns (bool);
        function transactions(uint256 transactionId) external view returns (address destination, uint256 value, bytes memory data, bool executed);

        event Submission(uint256 indexed transactionId);
        event Confirmation(address indexed sender, uint256 indexed transactionId);
        event Execution(uint256 indexed transactionId);
    }
}
